//! Prompt assembly.
//!
//! Every builder here is a pure function of its inputs. Missing profile
//! fields are replaced by neutral placeholders so assembly never fails.

mod broadcast;
mod profile;
mod rewrite;
mod vacancy;

pub use broadcast::{MessageLength, broadcast_context, broadcast_system};
pub use rewrite::{ChannelInfo, RewritePrompt, rewrite_prompt};
pub use vacancy::{VACANCY_GENERATE_INSTRUCTION, vacancy_context, vacancy_system};
