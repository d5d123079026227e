use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of text being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    /// Outreach message posted to channels.
    Broadcast,
    /// Response to a job posting.
    Vacancy,
}

/// A saved generation result owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub user_id: String,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    pub user_id: String,
    pub kind: MessageKind,
    pub content: String,
}
