//! The moderation platform trait.

use crate::{IncomingMessage, Permission, PlatformChannel, PlatformServer, PlatformUser};
use async_trait::async_trait;
use bailiff_core::{ChannelId, MessageId, ServerId, UserId};
use bailiff_error::PlatformError;

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Operations the moderation core needs from a chat platform.
///
/// Every method is a suspension point: callers must not hold the moderation
/// state lock across these calls.
///
/// # Errors
///
/// Implementations return [`PlatformError`] when the remote API fails or the
/// bot lacks permission. Callers treat that as fatal to the one operation and
/// log it; nothing is retried.
#[async_trait]
pub trait ModerationPlatform: Send + Sync {
    /// Post a message in a channel.
    async fn send_message(&self, channel: ChannelId, content: &str) -> PlatformResult<()>;

    /// Send a private message to a user.
    async fn send_direct_message(&self, user: UserId, content: &str) -> PlatformResult<()>;

    /// Delete a message.
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()>;

    /// Ban a user from a server.
    async fn ban(&self, server: ServerId, user: UserId, reason: &str) -> PlatformResult<()>;

    /// Lift a ban.
    async fn unban(&self, server: ServerId, user: UserId) -> PlatformResult<()>;

    /// Look a user up by ID.
    async fn resolve_user(&self, user: UserId) -> PlatformResult<PlatformUser>;

    /// Look a member of `server` up by display name.
    async fn resolve_user_by_name(
        &self,
        server: ServerId,
        name: &str,
    ) -> PlatformResult<Option<PlatformUser>>;

    /// Look a server up by ID.
    async fn get_server(&self, server: ServerId) -> PlatformResult<PlatformServer>;

    /// Look a channel up by ID.
    async fn get_channel(&self, channel: ChannelId) -> PlatformResult<PlatformChannel>;

    /// Whether the author of `message` holds `permission` where it was sent.
    ///
    /// Administrators and the bot owner hold every permission. Direct
    /// messages hold none.
    async fn has_permission(
        &self,
        message: &IncomingMessage,
        permission: Permission,
    ) -> PlatformResult<bool>;

    /// Whether the author of `message` bypasses slow mode.
    ///
    /// True for the bot owner, administrators, members holding a moderator or
    /// admin role, and anyone with the "manage messages" permission.
    async fn is_exempt(&self, message: &IncomingMessage) -> PlatformResult<bool>;
}
