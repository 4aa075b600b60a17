//! [`ModerationPlatform`] over the Discord HTTP API.

use crate::{DiscordError, is_mod_role, normalize_roles};
use async_trait::async_trait;
use bailiff_core::{ChannelId, MessageId, ServerId, UserId};
use bailiff_error::{PlatformError, PlatformErrorKind};
use bailiff_interface::{
    IncomingMessage, ModerationPlatform, Permission, PlatformChannel, PlatformResult,
    PlatformServer, PlatformUser,
};
use serenity::all::{
    Channel, ChannelId as DiscordChannelId, GuildId, Http, Member, MessageId as DiscordMessageId,
    PartialGuild, Permissions, UserId as DiscordUserId,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Discord calls the moderation core needs, made through serenity's HTTP client.
pub struct DiscordPlatform {
    http: Arc<Http>,
    owner_id: Option<UserId>,
    mod_roles: Vec<String>,
}

impl std::fmt::Debug for DiscordPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordPlatform")
            .field("owner_id", &self.owner_id)
            .field("mod_roles", &self.mod_roles)
            .finish_non_exhaustive()
    }
}

impl DiscordPlatform {
    /// Create a platform on top of an HTTP client.
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            http,
            owner_id: None,
            mod_roles: Vec::new(),
        }
    }

    /// Create a platform with its own HTTP client for `token`.
    pub fn from_token(token: &str) -> Self {
        Self::new(Arc::new(Http::new(token)))
    }

    /// The bot owner, who holds every permission everywhere.
    pub fn with_owner(mut self, owner_id: Option<UserId>) -> Self {
        self.owner_id = owner_id;
        self
    }

    /// Role names whose members bypass slow mode.
    pub fn with_mod_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mod_roles = normalize_roles(roles);
        self
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &Arc<Http> {
        &self.http
    }

    fn is_owner(&self, user: UserId) -> bool {
        self.owner_id == Some(user)
    }

    /// Fetch the guild and the member's view of it.
    async fn member_context(
        &self,
        server: ServerId,
        user: UserId,
    ) -> PlatformResult<(PartialGuild, Member)> {
        let guild_id = GuildId::new(server.get());
        let guild = self.http.get_guild(guild_id).await.map_err(api_error)?;
        let member = self
            .http
            .get_member(guild_id, DiscordUserId::new(user.get()))
            .await
            .map_err(api_error)?;
        Ok((guild, member))
    }

    fn holds_mod_role(&self, guild: &PartialGuild, member: &Member) -> bool {
        member.roles.iter().any(|role_id| {
            guild
                .roles
                .get(role_id)
                .is_some_and(|role| is_mod_role(&role.name, &self.mod_roles))
        })
    }
}

fn api_error(err: serenity::Error) -> PlatformError {
    DiscordError::from(err).into()
}

fn grants(permissions: Permissions, permission: Permission) -> bool {
    if permissions.administrator() {
        return true;
    }
    match permission {
        Permission::BanMembers => permissions.ban_members(),
        Permission::ManageMessages => permissions.manage_messages(),
    }
}

#[async_trait]
impl ModerationPlatform for DiscordPlatform {
    #[instrument(skip(self, content), fields(channel_id = %channel, len = content.len()))]
    async fn send_message(&self, channel: ChannelId, content: &str) -> PlatformResult<()> {
        DiscordChannelId::new(channel.get())
            .say(&self.http, content)
            .await
            .map_err(api_error)?;
        Ok(())
    }

    #[instrument(skip(self, content), fields(user_id = %user))]
    async fn send_direct_message(&self, user: UserId, content: &str) -> PlatformResult<()> {
        let map = serde_json::json!({ "recipient_id": user.to_string() });
        let dm = self
            .http
            .create_private_channel(&map)
            .await
            .map_err(api_error)?;
        dm.id.say(&self.http, content).await.map_err(api_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(channel_id = %channel, message_id = %message))]
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        DiscordChannelId::new(channel.get())
            .delete_message(&self.http, DiscordMessageId::new(message.get()))
            .await
            .map_err(api_error)
    }

    #[instrument(skip(self, reason), fields(server_id = %server, user_id = %user))]
    async fn ban(&self, server: ServerId, user: UserId, reason: &str) -> PlatformResult<()> {
        // Discord caps audit log reasons at 512 characters.
        let reason: String = reason.chars().take(512).collect();
        GuildId::new(server.get())
            .ban_with_reason(&self.http, DiscordUserId::new(user.get()), 0, &reason)
            .await
            .map_err(api_error)
    }

    #[instrument(skip(self), fields(server_id = %server, user_id = %user))]
    async fn unban(&self, server: ServerId, user: UserId) -> PlatformResult<()> {
        GuildId::new(server.get())
            .unban(&self.http, DiscordUserId::new(user.get()))
            .await
            .map_err(api_error)
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn resolve_user(&self, user: UserId) -> PlatformResult<PlatformUser> {
        let found = self
            .http
            .get_user(DiscordUserId::new(user.get()))
            .await
            .map_err(|e| {
                debug!(error = %e, "User lookup failed");
                PlatformError::new(PlatformErrorKind::UserNotFound(user.get()))
            })?;
        Ok(PlatformUser::new(user, found.name))
    }

    #[instrument(skip(self), fields(server_id = %server))]
    async fn resolve_user_by_name(
        &self,
        server: ServerId,
        name: &str,
    ) -> PlatformResult<Option<PlatformUser>> {
        let members = self
            .http
            .search_guild_members(GuildId::new(server.get()), name, Some(25))
            .await
            .map_err(api_error)?;

        Ok(members
            .into_iter()
            .find(|m| m.user.name == name || m.display_name() == name)
            .map(|m| PlatformUser::new(UserId::new(m.user.id.get()), m.user.name.clone())))
    }

    #[instrument(skip(self), fields(server_id = %server))]
    async fn get_server(&self, server: ServerId) -> PlatformResult<PlatformServer> {
        let guild = self
            .http
            .get_guild(GuildId::new(server.get()))
            .await
            .map_err(|e| {
                debug!(error = %e, "Guild lookup failed");
                PlatformError::new(PlatformErrorKind::ServerNotFound(server.get()))
            })?;
        Ok(PlatformServer {
            id: server,
            name: guild.name,
        })
    }

    #[instrument(skip(self), fields(channel_id = %channel))]
    async fn get_channel(&self, channel: ChannelId) -> PlatformResult<PlatformChannel> {
        let found = self
            .http
            .get_channel(DiscordChannelId::new(channel.get()))
            .await
            .map_err(|e| {
                debug!(error = %e, "Channel lookup failed");
                PlatformError::new(PlatformErrorKind::ChannelNotFound(channel.get()))
            })?;

        let (server_id, name) = match found {
            Channel::Guild(gc) => (Some(ServerId::new(gc.guild_id.get())), gc.name),
            Channel::Private(pc) => (None, pc.name()),
            _ => (None, String::new()),
        };
        Ok(PlatformChannel {
            id: channel,
            server_id,
            name,
        })
    }

    #[instrument(skip(self, message), fields(author_id = %message.author().id, %permission))]
    async fn has_permission(
        &self,
        message: &IncomingMessage,
        permission: Permission,
    ) -> PlatformResult<bool> {
        let Some(server) = *message.server_id() else {
            return Ok(false);
        };
        let author = message.author().id;
        if self.is_owner(author) {
            return Ok(true);
        }

        let (guild, member) = self.member_context(server, author).await?;
        #[allow(deprecated)]
        let permissions = guild.member_permissions(&member);
        Ok(grants(permissions, permission))
    }

    #[instrument(skip(self, message), fields(author_id = %message.author().id))]
    async fn is_exempt(&self, message: &IncomingMessage) -> PlatformResult<bool> {
        let Some(server) = *message.server_id() else {
            return Ok(false);
        };
        let author = message.author().id;
        if self.is_owner(author) {
            return Ok(true);
        }

        let (guild, member) = self.member_context(server, author).await?;
        if self.holds_mod_role(&guild, &member) {
            return Ok(true);
        }
        #[allow(deprecated)]
        let permissions = guild.member_permissions(&member);
        Ok(grants(permissions, Permission::ManageMessages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_grants_everything() {
        let admin = Permissions::ADMINISTRATOR;
        assert!(grants(admin, Permission::BanMembers));
        assert!(grants(admin, Permission::ManageMessages));
    }

    #[test]
    fn test_permissions_are_specific() {
        let banner = Permissions::BAN_MEMBERS;
        assert!(grants(banner, Permission::BanMembers));
        assert!(!grants(banner, Permission::ManageMessages));
        assert!(!grants(Permissions::empty(), Permission::BanMembers));
    }

    #[test]
    fn test_owner_check() {
        let platform = DiscordPlatform::from_token("token").with_owner(Some(UserId::new(7)));
        assert!(platform.is_owner(UserId::new(7)));
        assert!(!platform.is_owner(UserId::new(8)));
    }
}
