use async_trait::async_trait;

use super::model::{NewTemplate, Template};
use crate::error::Result;

/// Persistence contract for saved templates.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, template: NewTemplate) -> Result<Template>;

    async fn find_by_id(&self, template_id: &str) -> Result<Option<Template>>;

    /// Templates of the user, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Template>>;

    /// Deletes a template. Deleting a missing template is not an error.
    async fn delete(&self, template_id: &str) -> Result<()>;
}
