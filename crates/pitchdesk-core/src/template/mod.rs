//! Saved generation results.

mod model;
mod repository;

pub use model::{MessageKind, NewTemplate, Template};
pub use repository::TemplateRepository;
