//! Ephemeral per-user conversation state.
//!
//! Each variant carries only the fields that are valid in that state. A user
//! with no session is at the menu.

use pitchdesk_core::channel::Channel;
use pitchdesk_core::generation::ChatMessage;

use crate::composer::DraftTarget;
use crate::prompts::MessageLength;

#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Compose(ComposeSession),
    Radar(RadarSession),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposeSession {
    /// Gathering input for an outreach message; nothing generated yet.
    CollectingBroadcast {
        history: Vec<ChatMessage>,
        length: MessageLength,
    },
    /// Gathering the posting and extra details for a vacancy response.
    CollectingVacancy {
        history: Vec<ChatMessage>,
        has_vacancy: bool,
    },
    /// A draft exists and can be saved, regenerated or refined.
    Refining {
        target: DraftTarget,
        history: Vec<ChatMessage>,
        last_result: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RadarSession {
    /// Waiting for a free-text query.
    Searching,
    /// Reviewing candidates one card at a time.
    Browsing {
        candidates: Vec<Channel>,
        current_index: usize,
    },
}

impl Session {
    pub fn compose(&self) -> Option<&ComposeSession> {
        match self {
            Self::Compose(session) => Some(session),
            Self::Radar(_) => None,
        }
    }

    pub fn radar(&self) -> Option<&RadarSession> {
        match self {
            Self::Radar(session) => Some(session),
            Self::Compose(_) => None,
        }
    }

    /// Chat history of a compose session, empty for radar sessions.
    pub fn history(&self) -> &[ChatMessage] {
        match self {
            Self::Compose(ComposeSession::CollectingBroadcast { history, .. })
            | Self::Compose(ComposeSession::CollectingVacancy { history, .. })
            | Self::Compose(ComposeSession::Refining { history, .. }) => history,
            Self::Radar(_) => &[],
        }
    }

    /// Short state name for logs.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Compose(ComposeSession::CollectingBroadcast { .. }) => "collecting_broadcast",
            Self::Compose(ComposeSession::CollectingVacancy { .. }) => "collecting_vacancy",
            Self::Compose(ComposeSession::Refining { .. }) => "refining",
            Self::Radar(RadarSession::Searching) => "searching",
            Self::Radar(RadarSession::Browsing { .. }) => "browsing",
        }
    }
}

impl From<ComposeSession> for Session {
    fn from(session: ComposeSession) -> Self {
        Self::Compose(session)
    }
}

impl From<RadarSession> for Session {
    fn from(session: RadarSession) -> Self {
        Self::Radar(session)
    }
}
