pub mod chat;
pub mod profile;
pub mod rewrite;
pub mod search;
