//! In-memory platform that records every side effect.

use crate::{
    IncomingMessage, ModerationPlatform, Permission, PlatformChannel, PlatformResult, PlatformServer,
    PlatformUser,
};
use async_trait::async_trait;
use bailiff_core::{ChannelId, MessageId, ServerId, UserId};
use bailiff_error::{PlatformError, PlatformErrorKind};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// A side effect requested from the platform.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PlatformCall {
    /// Message posted in a channel
    #[display("send({channel}): {content}")]
    SendMessage {
        /// Target channel
        channel: ChannelId,
        /// Message text
        content: String,
    },
    /// Private message sent to a user
    #[display("dm({user}): {content}")]
    DirectMessage {
        /// Recipient
        user: UserId,
        /// Message text
        content: String,
    },
    /// Message deleted
    #[display("delete({channel}/{message})")]
    DeleteMessage {
        /// Channel holding the message
        channel: ChannelId,
        /// Deleted message
        message: MessageId,
    },
    /// User banned
    #[display("ban({server}/{user}): {reason}")]
    Ban {
        /// Server
        server: ServerId,
        /// Banned user
        user: UserId,
        /// Audit log reason
        reason: String,
    },
    /// Ban lifted
    #[display("unban({server}/{user})")]
    Unban {
        /// Server
        server: ServerId,
        /// Unbanned user
        user: UserId,
    },
}

#[derive(Debug, Default)]
struct Directory {
    users: HashMap<UserId, String>,
    servers: HashMap<ServerId, String>,
    channels: HashMap<ChannelId, (Option<ServerId>, String)>,
    exempt: HashSet<UserId>,
    permissions: HashSet<(UserId, Permission)>,
    failing_bans: bool,
    failing_unbans: bool,
}

type BanHook = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

#[derive(Default)]
struct Hooks {
    before_ban: Option<BanHook>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_ban", &self.before_ban.is_some())
            .finish()
    }
}

/// Platform double that keeps a log of calls instead of contacting a service.
///
/// Users, servers and channels must be registered before they can be
/// resolved; unknown IDs produce the matching `*NotFound` error, just like a
/// real platform would.
///
/// ```
/// use bailiff_core::{ServerId, UserId};
/// use bailiff_interface::{ModerationPlatform, PlatformCall, RecordingPlatform};
///
/// # tokio_test_block(async {
/// let platform = RecordingPlatform::new().with_server(ServerId::new(1), "Lounge");
/// platform.unban(ServerId::new(1), UserId::new(2)).await.unwrap();
/// assert_eq!(
///     platform.calls(),
///     vec![PlatformCall::Unban { server: ServerId::new(1), user: UserId::new(2) }]
/// );
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    directory: Mutex<Directory>,
    calls: Mutex<Vec<PlatformCall>>,
    hooks: Mutex<Hooks>,
}

impl RecordingPlatform {
    /// Create an empty platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` at the start of every `ban` call, before the ban is
    /// recorded or refused. Lets a test act while a ban is in flight.
    pub fn before_ban<F, Fut>(&self, hook: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.hooks.lock().before_ban = Some(Arc::new(move || Box::pin(hook())));
    }

    /// Register a user.
    pub fn with_user(self, id: UserId, name: impl Into<String>) -> Self {
        self.directory.lock().users.insert(id, name.into());
        self
    }

    /// Register a server.
    pub fn with_server(self, id: ServerId, name: impl Into<String>) -> Self {
        self.directory.lock().servers.insert(id, name.into());
        self
    }

    /// Register a channel.
    pub fn with_channel(
        self,
        id: ChannelId,
        server_id: Option<ServerId>,
        name: impl Into<String>,
    ) -> Self {
        self.directory
            .lock()
            .channels
            .insert(id, (server_id, name.into()));
        self
    }

    /// Mark a user as exempt from slow mode.
    pub fn with_exempt(self, id: UserId) -> Self {
        self.directory.lock().exempt.insert(id);
        self
    }

    /// Grant `permission` to a user.
    pub fn with_permission(self, id: UserId, permission: Permission) -> Self {
        self.directory.lock().permissions.insert((id, permission));
        self
    }

    /// Grant a user every moderation permission and slow mode exemption.
    pub fn with_moderator(self, id: UserId) -> Self {
        self.with_permission(id, Permission::BanMembers)
            .with_permission(id, Permission::ManageMessages)
            .with_exempt(id)
    }

    /// Make every subsequent ban fail with an API error.
    pub fn fail_bans(&self, failing: bool) {
        self.directory.lock().failing_bans = failing;
    }

    /// Make every subsequent unban fail with an API error.
    pub fn fail_unbans(&self, failing: bool) {
        self.directory.lock().failing_unbans = failing;
    }

    /// Every call recorded so far, oldest first.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    /// Recorded unbans, oldest first.
    pub fn unbans(&self) -> Vec<(ServerId, UserId)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::Unban { server, user } => Some((*server, *user)),
                _ => None,
            })
            .collect()
    }

    /// Text of every message posted in `channel`, oldest first.
    pub fn messages_in(&self, channel: ChannelId) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::SendMessage { channel: c, content } if *c == channel => {
                    Some(content.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls, keeping registrations.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: PlatformCall) {
        debug!(%call, "RecordingPlatform: call recorded");
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ModerationPlatform for RecordingPlatform {
    async fn send_message(&self, channel: ChannelId, content: &str) -> PlatformResult<()> {
        self.record(PlatformCall::SendMessage {
            channel,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn send_direct_message(&self, user: UserId, content: &str) -> PlatformResult<()> {
        self.record(PlatformCall::DirectMessage {
            user,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        self.record(PlatformCall::DeleteMessage { channel, message });
        Ok(())
    }

    async fn ban(&self, server: ServerId, user: UserId, reason: &str) -> PlatformResult<()> {
        let hook = self.hooks.lock().before_ban.clone();
        if let Some(hook) = hook {
            hook().await;
        }
        if self.directory.lock().failing_bans {
            return Err(PlatformError::new(PlatformErrorKind::InsufficientPermissions(
                "ban rejected".to_string(),
            )));
        }
        self.record(PlatformCall::Ban {
            server,
            user,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn unban(&self, server: ServerId, user: UserId) -> PlatformResult<()> {
        if self.directory.lock().failing_unbans {
            return Err(PlatformError::new(PlatformErrorKind::Api(
                "unban rejected".to_string(),
            )));
        }
        self.record(PlatformCall::Unban { server, user });
        Ok(())
    }

    async fn resolve_user(&self, user: UserId) -> PlatformResult<PlatformUser> {
        self.directory
            .lock()
            .users
            .get(&user)
            .map(|name| PlatformUser::new(user, name.clone()))
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::UserNotFound(user.get())))
    }

    async fn resolve_user_by_name(
        &self,
        _server: ServerId,
        name: &str,
    ) -> PlatformResult<Option<PlatformUser>> {
        Ok(self
            .directory
            .lock()
            .users
            .iter()
            .find(|(_, known)| known.as_str() == name)
            .map(|(id, known)| PlatformUser::new(*id, known.clone())))
    }

    async fn get_server(&self, server: ServerId) -> PlatformResult<PlatformServer> {
        self.directory
            .lock()
            .servers
            .get(&server)
            .map(|name| PlatformServer {
                id: server,
                name: name.clone(),
            })
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::ServerNotFound(server.get())))
    }

    async fn get_channel(&self, channel: ChannelId) -> PlatformResult<PlatformChannel> {
        self.directory
            .lock()
            .channels
            .get(&channel)
            .map(|(server_id, name)| PlatformChannel {
                id: channel,
                server_id: *server_id,
                name: name.clone(),
            })
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::ChannelNotFound(channel.get())))
    }

    async fn has_permission(
        &self,
        message: &IncomingMessage,
        permission: Permission,
    ) -> PlatformResult<bool> {
        Ok(message.in_server()
            && self
                .directory
                .lock()
                .permissions
                .contains(&(message.author().id, permission)))
    }

    async fn is_exempt(&self, message: &IncomingMessage) -> PlatformResult<bool> {
        Ok(self.directory.lock().exempt.contains(&message.author().id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let platform = RecordingPlatform::new();

        let err = platform.resolve_user(UserId::new(9)).await.unwrap_err();
        assert_eq!(err.kind(), &PlatformErrorKind::UserNotFound(9));

        let err = platform.get_server(ServerId::new(3)).await.unwrap_err();
        assert_eq!(err.kind(), &PlatformErrorKind::ServerNotFound(3));
    }

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let platform = RecordingPlatform::new();
        let channel = ChannelId::new(10);

        platform.send_message(channel, "first").await.unwrap();
        platform
            .ban(ServerId::new(1), UserId::new(2), "spam")
            .await
            .unwrap();
        platform.send_message(channel, "second").await.unwrap();

        assert_eq!(platform.calls().len(), 3);
        assert_eq!(platform.messages_in(channel), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_ban_hook_runs_first() {
        let platform = Arc::new(RecordingPlatform::new());
        let inner = platform.clone();
        platform.before_ban(move || {
            let inner = inner.clone();
            async move {
                inner.send_message(ChannelId::new(5), "hook").await.unwrap();
            }
        });

        platform
            .ban(ServerId::new(1), UserId::new(2), "spam")
            .await
            .unwrap();
        let calls = platform.calls();
        assert!(matches!(calls[0], PlatformCall::SendMessage { .. }));
        assert!(matches!(calls[1], PlatformCall::Ban { .. }));
    }

    #[tokio::test]
    async fn test_failing_unbans_record_nothing() {
        let platform = RecordingPlatform::new();
        platform.fail_unbans(true);

        assert!(platform.unban(ServerId::new(1), UserId::new(2)).await.is_err());
        assert!(platform.unbans().is_empty());
    }

    #[tokio::test]
    async fn test_exemption_follows_registration() {
        let platform = RecordingPlatform::new().with_exempt(UserId::new(5));
        let message = |author: u64| {
            IncomingMessage::new(
                MessageId::new(1),
                ChannelId::new(2),
                Some(ServerId::new(3)),
                PlatformUser::new(UserId::new(author), "someone"),
                "hello",
            )
        };

        assert!(platform.is_exempt(&message(5)).await.unwrap());
        assert!(!platform.is_exempt(&message(6)).await.unwrap());
    }

    #[tokio::test]
    async fn test_moderator_holds_every_permission() {
        let platform = RecordingPlatform::new().with_moderator(UserId::new(5));
        let message = IncomingMessage::new(
            MessageId::new(1),
            ChannelId::new(2),
            Some(ServerId::new(3)),
            PlatformUser::new(UserId::new(5), "mod"),
            "!slowoff",
        );

        for permission in [Permission::BanMembers, Permission::ManageMessages] {
            assert!(platform.has_permission(&message, permission).await.unwrap());
        }
        assert!(platform.is_exempt(&message).await.unwrap());
    }
}
