//! Text generation gateway.
//!
//! `TextGenerator` is the narrow contract implemented by concrete model
//! clients. `GenerationGateway` wraps one generator and gives every caller the
//! same behaviour: a fixed time bound, trimmed output, empty output rejected,
//! failures logged with their classified kind.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use super::error::GenerationError;
use super::message::ChatMessage;
use super::request::{GenerationParams, GenerationRequest, VARIANT_TEMPERATURE};

/// Upper bound applied to a single generation request.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Submits a conversation to a language model and returns its text.
///
/// Implementations map their transport failures onto [`GenerationError`]
/// and must not retry internally.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Uniform request/response wrapper around a [`TextGenerator`].
#[derive(Clone)]
pub struct GenerationGateway {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    params: GenerationParams,
}

impl GenerationGateway {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_GENERATION_TIMEOUT,
            params: GenerationParams::default(),
        }
    }

    /// Overrides the per-request time bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the parameters used by [`chat`](Self::chat) and
    /// [`single_turn`](Self::single_turn).
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Submits a prepared request.
    pub async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let turns = request.messages.len();
        let outcome = match tokio::time::timeout(self.timeout, self.generator.generate(request)).await
        {
            Ok(result) => result.and_then(normalize_output),
            Err(_) => Err(GenerationError::Timeout),
        };

        match &outcome {
            Ok(text) => {
                tracing::debug!(turns, chars = text.chars().count(), "generation succeeded");
            }
            Err(err) => {
                tracing::error!(turns, kind = err.kind(), error = %err, "generation failed");
            }
        }
        outcome
    }

    /// Generates a reply to `history` under the `system` instructions.
    pub async fn chat(
        &self,
        system: &str,
        history: &[ChatMessage],
    ) -> Result<String, GenerationError> {
        let request = GenerationRequest::conversation(system, history).with_params(self.params);
        self.generate(request).await
    }

    /// Generates a reply to a single user prompt.
    pub async fn single_turn(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let request = GenerationRequest::single_turn(system, user).with_params(self.params);
        self.generate(request).await
    }

    /// Issues `count` independent single-turn requests at elevated creativity
    /// and returns every variant that succeeded, in request order.
    ///
    /// Partial success is not an error; only when every attempt fails does
    /// this return [`GenerationError::NoVariants`].
    pub async fn variants(
        &self,
        system: &str,
        user: &str,
        count: usize,
    ) -> Result<Vec<String>, GenerationError> {
        let params = self.params.with_temperature(VARIANT_TEMPERATURE);
        let attempts = (0..count).map(|_| {
            let request = GenerationRequest::single_turn(system, user).with_params(params);
            self.generate(request)
        });

        let mut variants = Vec::with_capacity(count);
        for (index, result) in join_all(attempts).await.into_iter().enumerate() {
            match result {
                Ok(text) => variants.push(text),
                Err(err) => {
                    tracing::warn!(variant = index + 1, count, error = %err, "variant generation failed");
                }
            }
        }

        if variants.is_empty() {
            return Err(GenerationError::NoVariants { attempts: count });
        }
        Ok(variants)
    }
}

fn normalize_output(text: String) -> Result<String, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}
