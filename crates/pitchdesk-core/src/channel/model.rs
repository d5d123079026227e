//! Channel domain models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A known external channel, unique per `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique identifier (UUID format)
    pub id: String,
    /// External identity, without the leading `@`
    pub username: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subscribers_count: Option<u64>,
    #[serde(default)]
    pub category: Option<String>,
    /// Where the channel was first discovered
    pub source: String,
    pub created_at: String,
}

impl Channel {
    /// Title for display, falling back to the username.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Catalog data for a channel that may not be stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChannel {
    pub username: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub subscribers_count: Option<u64>,
    pub category: Option<String>,
}

/// What a linked channel is used for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChannelPurpose {
    /// The user posts outreach messages there.
    Broadcast,
    /// The user reads vacancies there.
    Vacancies,
    Both,
}

/// A durable (user, channel, purpose) association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChannel {
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    pub purpose: ChannelPurpose,
    pub is_active: bool,
    pub created_at: String,
}

/// A link joined with its catalog entry, as listed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedChannel {
    pub link: UserChannel,
    pub channel: Channel,
}
