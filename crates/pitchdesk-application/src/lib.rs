//! Application layer for Pitchdesk.
//!
//! Prompt assembly, the composer and radar services, and the conversation
//! engine that drives them from user events.

pub mod composer;
pub mod flow;
pub mod prompts;
pub mod radar;

pub use composer::{ComposerService, DEFAULT_VARIANT_COUNT, DraftTarget};
pub use flow::{
    Action, ComposeAction, Dispatcher, Notice, Presenter, RadarAction, Screen, Session, Trigger,
    View,
};
pub use prompts::MessageLength;
pub use radar::RadarService;
