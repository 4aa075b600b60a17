//! Serenity event handler feeding the moderation service.

use super::DiscordPlatform;
use bailiff_core::{ChannelId, MessageId, ServerId, UserId};
use bailiff_interface::{IncomingMessage, PlatformUser};
use bailiff_moderation::{MessageOutcome, ModerationService};
use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Event handler for the Bailiff Discord bot.
///
/// Hands every non-bot message to the [`ModerationService`].
pub struct BailiffHandler {
    service: Arc<ModerationService<DiscordPlatform>>,
}

impl BailiffHandler {
    /// Create a handler for `service`.
    pub fn new(service: Arc<ModerationService<DiscordPlatform>>) -> Self {
        Self { service }
    }

    /// Required gateway intents for the bot.
    ///
    /// Message content is needed to read commands, guild members to resolve
    /// names and permissions.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Convert a serenity message to the platform-neutral view.
    pub fn incoming(msg: &Message) -> IncomingMessage {
        IncomingMessage::new(
            MessageId::new(msg.id.get()),
            ChannelId::new(msg.channel_id.get()),
            msg.guild_id.map(|g| ServerId::new(g.get())),
            PlatformUser::new(UserId::new(msg.author.id.get()), msg.author.name.clone()),
            msg.content.clone(),
        )
    }
}

#[async_trait]
impl EventHandler for BailiffHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let incoming = Self::incoming(&msg);
        match self.service.handle_message(&incoming).await {
            Ok(MessageOutcome::Ignored) => {}
            Ok(outcome) => debug!(message_id = %incoming.id(), ?outcome, "Message handled"),
            Err(e) => error!(message_id = %incoming.id(), error = %e, "Command failed"),
        }
    }
}
