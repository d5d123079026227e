//! Composer service: message drafting, templates and rewriting.
//!
//! Stateless over the conversation. The compose flow owns the chat history
//! and passes it in; this service only assembles prompts, calls the
//! generation gateway and touches the template store.

use std::sync::Arc;

use pitchdesk_core::channel::Channel;
use pitchdesk_core::error::Result;
use pitchdesk_core::generation::{ChatMessage, GenerationError, GenerationGateway};
use pitchdesk_core::profile::ProfileRepository;
use pitchdesk_core::template::{MessageKind, NewTemplate, Template, TemplateRepository};

use crate::prompts::{
    ChannelInfo, MessageLength, broadcast_context, broadcast_system, rewrite_prompt,
    vacancy_context, vacancy_system,
};

/// Number of variants produced by [`ComposerService::rewrite_variants`] by default.
pub const DEFAULT_VARIANT_COUNT: usize = 3;

/// What a draft is being generated for.
///
/// Length only exists for broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    Broadcast { length: MessageLength },
    Vacancy,
}

impl DraftTarget {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Broadcast { .. } => MessageKind::Broadcast,
            Self::Vacancy => MessageKind::Vacancy,
        }
    }

    fn system_prompt(&self) -> String {
        match self {
            Self::Broadcast { length } => broadcast_system(*length),
            Self::Vacancy => vacancy_system(),
        }
    }
}

pub struct ComposerService {
    gateway: GenerationGateway,
    profiles: Arc<dyn ProfileRepository>,
    templates: Arc<dyn TemplateRepository>,
}

impl ComposerService {
    pub fn new(
        gateway: GenerationGateway,
        profiles: Arc<dyn ProfileRepository>,
        templates: Arc<dyn TemplateRepository>,
    ) -> Self {
        Self {
            gateway,
            profiles,
            templates,
        }
    }

    /// Initial history for a broadcast generated straight from the profile.
    pub async fn broadcast_seed(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let user = self.profiles.get_or_create_user(user_id).await?;
        Ok(vec![ChatMessage::user(broadcast_context(&user))])
    }

    /// Initial history for a vacancy response, primed with the profile.
    pub async fn vacancy_seed(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let user = self.profiles.get_or_create_user(user_id).await?;
        Ok(vec![ChatMessage::user(vacancy_context(&user))])
    }

    /// Generates the next draft for `target` from the accumulated history.
    pub async fn generate(
        &self,
        target: DraftTarget,
        history: &[ChatMessage],
    ) -> std::result::Result<String, GenerationError> {
        let text = self.gateway.chat(&target.system_prompt(), history).await?;
        tracing::info!(
            kind = %target.kind(),
            history_len = history.len(),
            "draft generated"
        );
        Ok(text)
    }

    /// Paraphrases `text`, optionally adapting it to a target channel.
    pub async fn rewrite(
        &self,
        text: &str,
        channel: Option<&Channel>,
    ) -> std::result::Result<String, GenerationError> {
        let info = channel.map(ChannelInfo::from);
        let prompt = rewrite_prompt(text, info.as_ref());
        self.gateway.single_turn(&prompt.system, &prompt.user).await
    }

    /// Produces up to `count` independent paraphrases of `text`.
    pub async fn rewrite_variants(
        &self,
        text: &str,
        channel: Option<&Channel>,
        count: usize,
    ) -> std::result::Result<Vec<String>, GenerationError> {
        let info = channel.map(ChannelInfo::from);
        let prompt = rewrite_prompt(text, info.as_ref());
        let variants = self
            .gateway
            .variants(&prompt.system, &prompt.user, count)
            .await?;
        tracing::info!(requested = count, produced = variants.len(), "rewrite variants generated");
        Ok(variants)
    }

    pub async fn save_template(
        &self,
        user_id: &str,
        kind: MessageKind,
        content: &str,
    ) -> Result<Template> {
        self.templates
            .create(NewTemplate {
                user_id: user_id.to_string(),
                kind,
                content: content.to_string(),
            })
            .await
    }

    /// Templates owned by `user_id`, newest first.
    pub async fn templates(&self, user_id: &str) -> Result<Vec<Template>> {
        self.templates.list_for_user(user_id).await
    }

    /// Looks up a template, hiding templates owned by other users.
    pub async fn template(&self, user_id: &str, template_id: &str) -> Result<Option<Template>> {
        let template = self.templates.find_by_id(template_id).await?;
        Ok(template.filter(|t| t.user_id == user_id))
    }

    /// Deletes a template owned by `user_id`. Unknown ids are ignored.
    pub async fn delete_template(&self, user_id: &str, template_id: &str) -> Result<()> {
        if self.template(user_id, template_id).await?.is_some() {
            self.templates.delete(template_id).await?;
        }
        Ok(())
    }
}
