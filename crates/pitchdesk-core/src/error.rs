//! Error type shared by the data store, configuration and wiring code.

use thiserror::Error;

/// Failures that abort the handling of the current event.
///
/// Generation failures are recoverable and live in
/// [`GenerationError`](crate::generation::GenerationError) instead.
#[derive(Error, Debug, Clone)]
pub enum PitchdeskError {
    /// A record referenced by id or username does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("I/O failure: {message}")]
    Io { message: String },

    /// The store refused or could not complete an operation.
    #[error("data store failure: {0}")]
    DataAccess(String),

    /// A snapshot or config file could not be encoded or decoded.
    #[error("invalid {format} data: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },

    /// Missing or unusable settings, e.g. no API key for the chat model.
    #[error("configuration problem: {0}")]
    Config(String),
}

impl PitchdeskError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for PitchdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{err} ({:?})", err.kind()),
        }
    }
}

impl From<serde_json::Error> for PitchdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON",
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PitchdeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML",
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PitchdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = PitchdeskError::not_found("channel", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "channel not found: abc");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: PitchdeskError = io.into();
        match err {
            PitchdeskError::Io { message } => assert!(message.contains("PermissionDenied")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_toml_conversion() {
        let err: PitchdeskError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, PitchdeskError::Serialization { format: "TOML", .. }));
    }
}
