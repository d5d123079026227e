//! External service adapters.
//!
//! - [`OpenAiChatClient`]: text generation against an OpenAI-compatible
//!   chat completions endpoint
//! - [`GroundedChannelSearch`]: channel discovery through grounded web search
//! - [`FallbackSearch`]: tries several search backends in order

pub mod fallback_search;
pub mod openai_chat_client;
pub mod web_search;

pub use fallback_search::FallbackSearch;
pub use openai_chat_client::OpenAiChatClient;
pub use web_search::GroundedChannelSearch;
