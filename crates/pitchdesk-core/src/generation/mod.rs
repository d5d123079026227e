//! Text generation domain module.
//!
//! # Module Structure
//!
//! - `message`: Role-tagged conversation turns (`ChatRole`, `ChatMessage`)
//! - `request`: Generation request and parameters
//! - `error`: Classified generation failures (`GenerationError`)
//! - `gateway`: The `TextGenerator` contract and the `GenerationGateway` wrapper

mod error;
mod gateway;
mod message;
mod request;

pub use error::GenerationError;
pub use gateway::{GenerationGateway, TextGenerator, DEFAULT_GENERATION_TIMEOUT};
pub use message::{ChatMessage, ChatRole};
pub use request::{GenerationParams, GenerationRequest, VARIANT_TEMPERATURE};
