//! Channel discovery contracts.
//!
//! - `model`: `RawCandidate`, the backend's unnormalized output
//! - `backend`: `SearchBackend` trait
//! - `identity`: channel username parsing from `t.me` links

mod backend;
mod identity;
mod model;

pub use backend::SearchBackend;
pub use identity::username_from_link;
pub use model::RawCandidate;
