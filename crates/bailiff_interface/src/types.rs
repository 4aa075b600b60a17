//! Platform-neutral views of chat entities.

use bailiff_core::{ChannelId, MessageId, ServerId, UserId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A user as seen by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformUser {
    /// User ID
    pub id: UserId,
    /// Display name at lookup time
    pub name: String,
}

impl PlatformUser {
    /// Build a user view.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Chat mention markup for this user.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// A server (guild) as seen by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformServer {
    /// Server ID
    pub id: ServerId,
    /// Server name
    pub name: String,
}

/// A channel as seen by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformChannel {
    /// Channel ID
    pub id: ChannelId,
    /// Owning server, `None` for direct messages
    pub server_id: Option<ServerId>,
    /// Channel name
    pub name: String,
}

/// Server permissions the moderation core asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Permission {
    /// May issue `tempban`, `unban`, `banfetch` and `modchan`
    BanMembers,
    /// May issue `slowmode` and `slowoff`
    ManageMessages,
}

/// An inbound chat message handed to the moderation core.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct IncomingMessage {
    id: MessageId,
    channel_id: ChannelId,
    server_id: Option<ServerId>,
    author: PlatformUser,
    content: String,
}

impl IncomingMessage {
    /// Build a message view.
    pub fn new(
        id: MessageId,
        channel_id: ChannelId,
        server_id: Option<ServerId>,
        author: PlatformUser,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            channel_id,
            server_id,
            author,
            content: content.into(),
        }
    }

    /// Whether the message was sent in a server rather than a DM.
    pub fn in_server(&self) -> bool {
        self.server_id.is_some()
    }
}
