//! Inbound events and their compact token form.
//!
//! Front-ends that can only carry a short string per control (inline
//! buttons, numbered console menus) encode an [`Action`] with
//! [`Action::to_token`] and decode it with [`str::parse`]. Parsing happens
//! once here; the flows only ever see typed actions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use pitchdesk_core::channel::ChannelPurpose;

use crate::prompts::MessageLength;

/// One inbound user event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Free text typed by the user.
    Text(String),
    /// A control picked from the current screen.
    Action(Action),
}

impl Trigger {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl From<Action> for Trigger {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MainMenu,
    Compose(ComposeAction),
    Radar(RadarAction),
}

/// Canned refinement shortcuts available on a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickRefine {
    Shorter,
    Longer,
    Tone,
}

impl QuickRefine {
    /// Instruction appended to the conversation for this shortcut.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Shorter => "Сделай сообщение короче, сохрани суть.",
            Self::Longer => "Сделай сообщение длиннее, добавь деталей.",
            Self::Tone => "Измени тон сообщения — сделай более неформальным и дружелюбным.",
        }
    }

    fn token(&self) -> &'static str {
        match self {
            Self::Shorter => "shorter",
            Self::Longer => "longer",
            Self::Tone => "tone",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "shorter" => Some(Self::Shorter),
            "longer" => Some(Self::Longer),
            "tone" => Some(Self::Tone),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeAction {
    Menu,
    StartBroadcast,
    StartVacancy,
    SetLength(MessageLength),
    GenerateFromProfile,
    GenerateVacancy,
    Save,
    Regenerate,
    Refine(QuickRefine),
    Templates { page: usize },
    TemplateDetail { template_id: String },
    DeleteTemplate { template_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadarAction {
    Menu,
    StartSearch,
    ProfileSearch,
    Link {
        channel_id: String,
        purpose: ChannelPurpose,
    },
    Skip,
    Connections { page: usize },
    ConnectionDetail { link_id: String },
    ChangePurpose {
        link_id: String,
        purpose: ChannelPurpose,
    },
    Unlink { channel_id: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerParseError {
    #[error("empty action token")]
    Empty,

    #[error("unknown action token '{0}'")]
    Unknown(String),

    #[error("action '{action}' is missing its {field}")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error("invalid {field} '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

impl Action {
    /// Encodes the action as a `prefix:name[:args]` token.
    pub fn to_token(&self) -> String {
        match self {
            Self::MainMenu => "menu:main".to_string(),
            Self::Compose(action) => format!("cmp:{}", action.token_body()),
            Self::Radar(action) => format!("rad:{}", action.token_body()),
        }
    }
}

impl ComposeAction {
    fn token_body(&self) -> String {
        match self {
            Self::Menu => "menu".to_string(),
            Self::StartBroadcast => "broadcast".to_string(),
            Self::StartVacancy => "vacancy".to_string(),
            Self::SetLength(length) => format!("len:{length}"),
            Self::GenerateFromProfile => "from_profile".to_string(),
            Self::GenerateVacancy => "gen_vacancy".to_string(),
            Self::Save => "save".to_string(),
            Self::Regenerate => "regen".to_string(),
            Self::Refine(refine) => format!("refine:{}", refine.token()),
            Self::Templates { page } => format!("templates:{page}"),
            Self::TemplateDetail { template_id } => format!("tpl:{template_id}"),
            Self::DeleteTemplate { template_id } => format!("del:{template_id}"),
        }
    }

    fn parse(name: &str, args: &[&str]) -> Result<Self, TriggerParseError> {
        let action = match name {
            "menu" => Self::Menu,
            "broadcast" => Self::StartBroadcast,
            "vacancy" => Self::StartVacancy,
            "len" => {
                let value = required(args, 0, "len", "length")?;
                let length = value.parse().map_err(|_| invalid("length", value))?;
                Self::SetLength(length)
            }
            "from_profile" => Self::GenerateFromProfile,
            "gen_vacancy" => Self::GenerateVacancy,
            "save" => Self::Save,
            "regen" => Self::Regenerate,
            "refine" => {
                let value = required(args, 0, "refine", "shortcut")?;
                let refine = QuickRefine::from_token(value).ok_or_else(|| invalid("shortcut", value))?;
                Self::Refine(refine)
            }
            "templates" => Self::Templates {
                page: optional_page(args)?,
            },
            "tpl" => Self::TemplateDetail {
                template_id: required(args, 0, "tpl", "template id")?.to_string(),
            },
            "del" => Self::DeleteTemplate {
                template_id: required(args, 0, "del", "template id")?.to_string(),
            },
            other => return Err(TriggerParseError::Unknown(format!("cmp:{other}"))),
        };
        Ok(action)
    }
}

impl RadarAction {
    fn token_body(&self) -> String {
        match self {
            Self::Menu => "menu".to_string(),
            Self::StartSearch => "search".to_string(),
            Self::ProfileSearch => "profile".to_string(),
            Self::Link {
                channel_id,
                purpose,
            } => format!("link:{channel_id}:{purpose}"),
            Self::Skip => "skip".to_string(),
            Self::Connections { page } => format!("list:{page}"),
            Self::ConnectionDetail { link_id } => format!("ch:{link_id}"),
            Self::ChangePurpose { link_id, purpose } => format!("purpose:{link_id}:{purpose}"),
            Self::Unlink { channel_id } => format!("unlink:{channel_id}"),
        }
    }

    fn parse(name: &str, args: &[&str]) -> Result<Self, TriggerParseError> {
        let action = match name {
            "menu" => Self::Menu,
            "search" => Self::StartSearch,
            "profile" => Self::ProfileSearch,
            "link" => Self::Link {
                channel_id: required(args, 0, "link", "channel id")?.to_string(),
                purpose: purpose_arg(args, 1, "link")?,
            },
            "skip" => Self::Skip,
            "list" => Self::Connections {
                page: optional_page(args)?,
            },
            "ch" => Self::ConnectionDetail {
                link_id: required(args, 0, "ch", "link id")?.to_string(),
            },
            "purpose" => Self::ChangePurpose {
                link_id: required(args, 0, "purpose", "link id")?.to_string(),
                purpose: purpose_arg(args, 1, "purpose")?,
            },
            "unlink" => Self::Unlink {
                channel_id: required(args, 0, "unlink", "channel id")?.to_string(),
            },
            other => return Err(TriggerParseError::Unknown(format!("rad:{other}"))),
        };
        Ok(action)
    }
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    action: &'static str,
    field: &'static str,
) -> Result<&'a str, TriggerParseError> {
    args.get(index)
        .copied()
        .filter(|value| !value.is_empty())
        .ok_or(TriggerParseError::MissingField { action, field })
}

fn invalid(field: &'static str, value: &str) -> TriggerParseError {
    TriggerParseError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

fn optional_page(args: &[&str]) -> Result<usize, TriggerParseError> {
    match args.first().copied().filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map_err(|_| invalid("page", value)),
        None => Ok(0),
    }
}

fn purpose_arg(
    args: &[&str],
    index: usize,
    action: &'static str,
) -> Result<ChannelPurpose, TriggerParseError> {
    let value = required(args, index, action, "purpose")?;
    value.parse().map_err(|_| invalid("purpose", value))
}

impl FromStr for Action {
    type Err = TriggerParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TriggerParseError::Empty);
        }

        let parts: Vec<&str> = token.split(':').collect();
        let (prefix, name, args) = match parts.as_slice() {
            [prefix, name, args @ ..] => (*prefix, *name, args),
            _ => return Err(TriggerParseError::Unknown(token.to_string())),
        };

        match (prefix, name) {
            ("menu", "main") => Ok(Self::MainMenu),
            ("cmp", name) => ComposeAction::parse(name, args).map(Self::Compose),
            ("rad", name) => RadarAction::parse(name, args).map(Self::Radar),
            _ => Err(TriggerParseError::Unknown(token.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}
