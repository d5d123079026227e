//! User profile domain module.
//!
//! - `model`: `User`, `ProfileUpdate`, `SearchProfile`
//! - `repository`: `ProfileRepository` trait

mod model;
mod repository;

pub use model::{ProfileUpdate, SearchProfile, User};
pub use repository::ProfileRepository;
