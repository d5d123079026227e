//! Domain layer for Pitchdesk.
//!
//! Holds the entity models, the repository and external-service contracts
//! (`ProfileRepository`, `ChannelRepository`, `TemplateRepository`,
//! `TextGenerator`, `SearchBackend`), the shared error type and the
//! configuration model. Nothing here performs I/O except the generation
//! gateway, which only drives an injected generator.

pub mod channel;
pub mod config;
pub mod error;
pub mod generation;
pub mod profile;
pub mod search;
pub mod template;

pub use error::PitchdeskError;

/// Current time as an RFC 3339 timestamp, the format used by every record.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
