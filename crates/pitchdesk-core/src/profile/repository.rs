//! Profile repository trait.

use async_trait::async_trait;

use super::model::{ProfileUpdate, SearchProfile, User};
use crate::error::Result;

/// Persistence contract for users and their search profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a user by identifier.
    async fn find_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Returns the user with the given identifier, creating an empty one if
    /// it does not exist yet.
    async fn get_or_create_user(&self, user_id: &str) -> Result<User>;

    /// Applies a partial update and returns the post-update record.
    ///
    /// Fails with `NotFound` if the user does not exist.
    async fn update_user(&self, user_id: &str, update: ProfileUpdate) -> Result<User>;

    /// Returns the most recently created active search profile, if any.
    async fn active_search_profile(&self, user_id: &str) -> Result<Option<SearchProfile>>;

    /// Replaces the user's keyword list on the active search profile,
    /// creating one if needed.
    async fn save_search_keywords(&self, user_id: &str, keywords: Vec<String>)
        -> Result<SearchProfile>;
}
