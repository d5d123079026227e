//! Storage and configuration adapters for Pitchdesk.
//!
//! - [`LocalStore`]: in-process data store implementing every repository trait,
//!   optionally snapshotted to a JSON file
//! - [`ConfigService`]: TOML configuration with environment overrides
//! - [`storage::AtomicJsonFile`]: atomic, lock-protected JSON file writes

pub mod config_service;
pub mod local_store;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use local_store::LocalStore;
pub use paths::PitchdeskPaths;
