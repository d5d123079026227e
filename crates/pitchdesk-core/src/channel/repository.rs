//! Channel repository trait.

use async_trait::async_trait;

use super::model::{Channel, ChannelPurpose, LinkedChannel, NewChannel, UserChannel};
use crate::error::Result;

/// Persistence contract for the channel catalog and user links.
///
/// The two uniqueness invariants (one catalog entry per username, one active
/// link per user/channel pair) are enforced here through get-or-create
/// semantics, not by callers.
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Returns the catalog entry for `channel.username`, creating it if
    /// unseen. Usernames compare case-insensitively. An existing entry is
    /// returned as stored; its metadata is not overwritten.
    async fn get_or_create_by_username(&self, channel: NewChannel) -> Result<Channel>;

    async fn find_by_id(&self, channel_id: &str) -> Result<Option<Channel>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Channel>>;

    /// Returns the existing active link for the pair, or creates one with
    /// `purpose`. An existing link keeps its original purpose.
    async fn get_or_create_link(
        &self,
        user_id: &str,
        channel_id: &str,
        purpose: ChannelPurpose,
    ) -> Result<UserChannel>;

    async fn find_link(&self, user_id: &str, channel_id: &str) -> Result<Option<UserChannel>>;

    /// Active links of the user joined with their channels, in link creation order.
    async fn list_links(&self, user_id: &str) -> Result<Vec<LinkedChannel>>;

    /// Changes the purpose of a link in place.
    async fn update_link_purpose(&self, link_id: &str, purpose: ChannelPurpose)
        -> Result<UserChannel>;

    /// Removes the link between the user and the channel. Idempotent.
    async fn unlink(&self, user_id: &str, channel_id: &str) -> Result<()>;
}
