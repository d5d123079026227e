//! Classified generation failures.

use std::time::Duration;

use thiserror::Error;

/// Failure kinds surfaced by the text generation gateway.
///
/// The gateway never retries on its own; callers decide whether to show the
/// error and let the user trigger the operation again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The request did not complete within the gateway's time bound.
    #[error("generation request timed out")]
    Timeout,

    /// The provider rejected the request because of rate limiting.
    #[error("generation rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    /// The provider could not be reached.
    #[error("generation service unreachable: {0}")]
    ConnectionFailed(String),

    /// The provider answered without usable text.
    #[error("generation service returned an empty response")]
    EmptyResponse,

    /// Anything else: HTTP errors, malformed payloads, provider faults.
    #[error("unexpected generation failure: {0}")]
    Unexpected(String),

    /// Bulk mode produced no variant at all.
    #[error("no variants produced ({attempts} attempts failed)")]
    NoVariants { attempts: usize },
}

impl GenerationError {
    /// Whether the same request may succeed if re-triggered later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited { .. } | Self::ConnectionFailed(_)
        )
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RateLimited { .. } => "rate_limited",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::EmptyResponse => "empty_response",
            Self::Unexpected(_) => "unexpected",
            Self::NoVariants { .. } => "no_variants",
        }
    }
}
