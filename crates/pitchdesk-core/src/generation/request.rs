//! Generation request and parameters.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Temperature used by the bulk "N variants" mode.
pub const VARIANT_TEMPERATURE: f32 = 0.8;

/// Sampling parameters for a single generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Creativity level.
    pub temperature: f32,
    /// Upper bound on the size of the generated output.
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// An ordered conversation plus parameters, ready to be submitted.
///
/// Single-turn and full-conversation generations differ only in how the
/// message list is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// One system instruction followed by one user turn.
    pub fn single_turn(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            params: GenerationParams::default(),
        }
    }

    /// A system instruction followed by the accumulated conversation.
    pub fn conversation(system: impl Into<String>, history: &[ChatMessage]) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend(history.iter().cloned());
        Self {
            messages,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}
