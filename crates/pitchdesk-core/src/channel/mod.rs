//! Channel catalog and user–channel link domain module.

mod model;
mod repository;

pub use model::{Channel, ChannelPurpose, LinkedChannel, NewChannel, UserChannel};
pub use repository::ChannelRepository;
