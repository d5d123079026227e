//! Local data store.
//!
//! Implements every repository contract over a single in-memory snapshot
//! guarded by a `tokio::sync::RwLock`. When opened with a file path, each
//! successful mutation is written back as an atomic JSON snapshot and the
//! snapshot is reloaded on the next start.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use pitchdesk_core::channel::{
    Channel, ChannelPurpose, ChannelRepository, LinkedChannel, NewChannel, UserChannel,
};
use pitchdesk_core::error::Result;
use pitchdesk_core::profile::{ProfileRepository, ProfileUpdate, SearchProfile, User};
use pitchdesk_core::template::{NewTemplate, Template, TemplateRepository};
use pitchdesk_core::{PitchdeskError, timestamp};

use crate::storage::AtomicJsonFile;

/// Source tag recorded on catalog entries created through discovery.
pub const DISCOVERY_SOURCE: &str = "search";

/// Serialized form of the whole store. Every table keeps insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    search_profiles: Vec<SearchProfile>,
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    user_channels: Vec<UserChannel>,
    #[serde(default)]
    templates: Vec<Template>,
}

pub struct LocalStore {
    data: RwLock<StoreData>,
    snapshot: Option<Arc<AtomicJsonFile<StoreData>>>,
}

impl LocalStore {
    /// Creates an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            snapshot: None,
        }
    }

    /// Opens a store backed by a JSON snapshot at `path`, loading it if present.
    pub fn open(path: PathBuf) -> Result<Self> {
        let snapshot = AtomicJsonFile::<StoreData>::new(path);
        let data = snapshot.load()?.unwrap_or_default();
        tracing::info!(
            path = %snapshot.path().display(),
            users = data.users.len(),
            channels = data.channels.len(),
            "data store opened"
        );
        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(Arc::new(snapshot)),
        })
    }

    /// Applies `f` to a staged copy under the write lock. The copy replaces
    /// the live tables only after `f` succeeded and the snapshot was written.
    async fn mutate<R>(&self, f: impl FnOnce(&mut StoreData) -> Result<R>) -> Result<R> {
        let mut data = self.data.write().await;
        let mut staged = data.clone();
        let result = f(&mut staged)?;
        if let Some(snapshot) = &self.snapshot {
            let snapshot = Arc::clone(snapshot);
            staged = tokio::task::spawn_blocking(move || snapshot.save(&staged).map(|()| staged))
                .await
                .map_err(|e| PitchdeskError::data_access(format!("snapshot writer failed: {e}")))??;
        }
        *data = staged;
        Ok(result)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn empty_user(user_id: &str) -> User {
    let now = timestamp();
    User {
        id: user_id.to_string(),
        first_name: None,
        specializations: Vec::new(),
        services_description: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[async_trait]
impl ProfileRepository for LocalStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_or_create_user(&self, user_id: &str) -> Result<User> {
        if let Some(user) = self.find_user(user_id).await? {
            return Ok(user);
        }
        self.mutate(|data| {
            // Re-check under the write lock.
            if let Some(user) = data.users.iter().find(|u| u.id == user_id) {
                return Ok(user.clone());
            }
            let user = empty_user(user_id);
            data.users.push(user.clone());
            Ok(user)
        })
        .await
    }

    async fn update_user(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        self.mutate(|data| {
            let user = data
                .users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| PitchdeskError::not_found("user", user_id))?;

            if let Some(first_name) = update.first_name {
                user.first_name = Some(first_name);
            }
            if let Some(specializations) = update.specializations {
                user.specializations = specializations;
            }
            if let Some(services) = update.services_description {
                user.services_description = Some(services);
            }
            user.updated_at = timestamp();
            Ok(user.clone())
        })
        .await
    }

    async fn active_search_profile(&self, user_id: &str) -> Result<Option<SearchProfile>> {
        let data = self.data.read().await;
        Ok(data
            .search_profiles
            .iter()
            .rev()
            .find(|p| p.user_id == user_id && p.is_active)
            .cloned())
    }

    async fn save_search_keywords(
        &self,
        user_id: &str,
        keywords: Vec<String>,
    ) -> Result<SearchProfile> {
        self.mutate(|data| {
            let existing = data
                .search_profiles
                .iter_mut()
                .rev()
                .find(|p| p.user_id == user_id && p.is_active);

            if let Some(profile) = existing {
                profile.keywords = keywords;
                return Ok(profile.clone());
            }

            let profile = SearchProfile {
                id: new_id(),
                user_id: user_id.to_string(),
                keywords,
                min_budget: None,
                work_format: Vec::new(),
                is_active: true,
                created_at: timestamp(),
            };
            data.search_profiles.push(profile.clone());
            Ok(profile)
        })
        .await
    }
}

#[async_trait]
impl ChannelRepository for LocalStore {
    async fn get_or_create_by_username(&self, channel: NewChannel) -> Result<Channel> {
        if let Some(existing) = self.find_by_username(&channel.username).await? {
            return Ok(existing);
        }
        self.mutate(|data| {
            if let Some(existing) = data
                .channels
                .iter()
                .find(|c| c.username.eq_ignore_ascii_case(&channel.username))
            {
                return Ok(existing.clone());
            }
            let created = Channel {
                id: new_id(),
                username: channel.username,
                title: channel.title,
                description: channel.description,
                subscribers_count: channel.subscribers_count,
                category: channel.category,
                source: DISCOVERY_SOURCE.to_string(),
                created_at: timestamp(),
            };
            data.channels.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn find_by_id(&self, channel_id: &str) -> Result<Option<Channel>> {
        let data = self.data.read().await;
        Ok(data.channels.iter().find(|c| c.id == channel_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Channel>> {
        let data = self.data.read().await;
        Ok(data
            .channels
            .iter()
            .find(|c| c.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn get_or_create_link(
        &self,
        user_id: &str,
        channel_id: &str,
        purpose: ChannelPurpose,
    ) -> Result<UserChannel> {
        self.mutate(|data| {
            if !data.channels.iter().any(|c| c.id == channel_id) {
                return Err(PitchdeskError::not_found("channel", channel_id));
            }
            if let Some(existing) = data
                .user_channels
                .iter()
                .find(|l| l.user_id == user_id && l.channel_id == channel_id && l.is_active)
            {
                return Ok(existing.clone());
            }
            let link = UserChannel {
                id: new_id(),
                user_id: user_id.to_string(),
                channel_id: channel_id.to_string(),
                purpose,
                is_active: true,
                created_at: timestamp(),
            };
            data.user_channels.push(link.clone());
            Ok(link)
        })
        .await
    }

    async fn find_link(&self, user_id: &str, channel_id: &str) -> Result<Option<UserChannel>> {
        let data = self.data.read().await;
        Ok(data
            .user_channels
            .iter()
            .find(|l| l.user_id == user_id && l.channel_id == channel_id && l.is_active)
            .cloned())
    }

    async fn list_links(&self, user_id: &str) -> Result<Vec<LinkedChannel>> {
        let data = self.data.read().await;
        let mut linked = Vec::new();
        for link in data
            .user_channels
            .iter()
            .filter(|l| l.user_id == user_id && l.is_active)
        {
            let channel = data
                .channels
                .iter()
                .find(|c| c.id == link.channel_id)
                .ok_or_else(|| {
                    PitchdeskError::data_access(format!(
                        "link {} references missing channel {}",
                        link.id, link.channel_id
                    ))
                })?;
            linked.push(LinkedChannel {
                link: link.clone(),
                channel: channel.clone(),
            });
        }
        Ok(linked)
    }

    async fn update_link_purpose(
        &self,
        link_id: &str,
        purpose: ChannelPurpose,
    ) -> Result<UserChannel> {
        self.mutate(|data| {
            let link = data
                .user_channels
                .iter_mut()
                .find(|l| l.id == link_id)
                .ok_or_else(|| PitchdeskError::not_found("user_channel", link_id))?;
            link.purpose = purpose;
            Ok(link.clone())
        })
        .await
    }

    async fn unlink(&self, user_id: &str, channel_id: &str) -> Result<()> {
        self.mutate(|data| {
            data.user_channels
                .retain(|l| !(l.user_id == user_id && l.channel_id == channel_id));
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TemplateRepository for LocalStore {
    async fn create(&self, template: NewTemplate) -> Result<Template> {
        self.mutate(|data| {
            let created = Template {
                id: new_id(),
                user_id: template.user_id,
                kind: template.kind,
                content: template.content,
                created_at: timestamp(),
            };
            data.templates.push(created.clone());
            Ok(created)
        })
        .await
    }

    async fn find_by_id(&self, template_id: &str) -> Result<Option<Template>> {
        let data = self.data.read().await;
        Ok(data.templates.iter().find(|t| t.id == template_id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Template>> {
        let data = self.data.read().await;
        Ok(data
            .templates
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, template_id: &str) -> Result<()> {
        self.mutate(|data| {
            data.templates.retain(|t| t.id != template_id);
            Ok(())
        })
        .await
    }
}
