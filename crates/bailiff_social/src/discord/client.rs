//! Discord bot client setup and lifecycle management.

use super::{BailiffHandler, DiscordPlatform};
use crate::{DiscordError, DiscordErrorKind};
use bailiff_moderation::{DispatcherHandle, ModerationService, UnbanDispatcher};
use serenity::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Main Discord bot client for Bailiff.
///
/// Owns the serenity client and the unban dispatcher. The dispatcher is
/// started with the bot and drained when the gateway connection ends.
///
/// # Example
/// ```no_run
/// use bailiff_core::SystemClock;
/// use bailiff_moderation::ModerationService;
/// use bailiff_social::{BailiffBot, DiscordPlatform};
/// use bailiff_storage::{BanStore, JsonFilePersistence};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_TOKEN")?;
///     let store = BanStore::open(JsonFilePersistence::new("bans.json")).await?;
///     let platform = Arc::new(DiscordPlatform::from_token(&token));
///     let service = Arc::new(ModerationService::new(platform, store, Arc::new(SystemClock)));
///
///     let mut bot = BailiffBot::new(token, service).await?;
///     bot.start(Duration::from_secs(60), Duration::from_secs(300)).await?;
///     Ok(())
/// }
/// ```
pub struct BailiffBot {
    client: Client,
    service: Arc<ModerationService<DiscordPlatform>>,
}

impl BailiffBot {
    /// Create a new bot around `service`.
    ///
    /// # Errors
    /// Returns an error if the token is empty or the serenity client fails to build.
    #[instrument(skip(token, service), fields(token_len = token.len()))]
    pub async fn new(
        token: String,
        service: Arc<ModerationService<DiscordPlatform>>,
    ) -> Result<Self, DiscordError> {
        if token.trim().is_empty() {
            return Err(DiscordError::new(DiscordErrorKind::InvalidToken));
        }

        info!("Initializing Bailiff Discord bot");

        let handler = BailiffHandler::new(service.clone());
        let intents = BailiffHandler::intents();

        info!("Building Serenity client with intents: {:?}", intents);

        let client = Client::builder(&token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!("Serenity client built successfully");

        Ok(Self { client, service })
    }

    /// The shared moderation service.
    pub fn service(&self) -> &Arc<ModerationService<DiscordPlatform>> {
        &self.service
    }

    /// Start the unban dispatcher for this bot's service.
    pub fn spawn_dispatcher(&self, poll: Duration, prune: Duration) -> DispatcherHandle {
        UnbanDispatcher::spawn(self.service.clone(), poll, prune)
    }

    /// Run the bot until the gateway connection ends or Ctrl+C is pressed.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or encounters a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self, poll: Duration, prune: Duration) -> Result<(), DiscordError> {
        info!("Starting Discord bot");

        let dispatcher = self.spawn_dispatcher(poll, prune);
        let shard_manager = self.client.shard_manager.clone();

        let result = tokio::select! {
            res = self.client.start() => res.map_err(|e| {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(format!(
                    "Client error: {}",
                    e
                )))
            }),
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                info!("Shutdown requested");
                shard_manager.shutdown_all().await;
                Ok(())
            }
        };

        dispatcher.shutdown().await;
        info!("Discord bot stopped");
        result
    }
}
