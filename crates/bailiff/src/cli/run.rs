//! `run` subcommand: start the Discord bot.

use bailiff::{BailiffConfig, BailiffResult};

/// Connect to Discord and moderate until Ctrl+C.
///
/// Reads `DISCORD_TOKEN` from the environment (or `.env`).
#[cfg(feature = "discord")]
pub async fn run_bot(config: &BailiffConfig) -> BailiffResult<()> {
    use bailiff::{
        BailiffBot, BanStore, ConfigError, ConfigErrorKind, DiscordPlatform, JsonFilePersistence,
        ModerationService, PlatformError, SlowMode, SystemClock,
    };
    use std::sync::Arc;
    use tracing::info;

    let _ = dotenvy::dotenv();
    let token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| {
        ConfigError::new(ConfigErrorKind::MissingVariable("DISCORD_TOKEN".to_string()))
    })?;

    let store = BanStore::open(JsonFilePersistence::new(&config.bans.data_file)).await?;
    info!(
        path = %config.bans.data_file.display(),
        tempbans = store.len(),
        "Loaded ban file"
    );

    let platform = DiscordPlatform::from_token(&token)
        .with_owner(config.owner())
        .with_mod_roles(&config.bot.mod_roles);

    let service = ModerationService::new(Arc::new(platform), store, Arc::new(SystemClock))
        .with_prefix(&config.bot.prefix)
        .with_slow_mode(SlowMode::from_config(&config.slow_mode));

    let mut bot = BailiffBot::new(token, Arc::new(service))
        .await
        .map_err(PlatformError::from)?;
    bot.start(config.poll_interval(), config.prune_interval())
        .await
        .map_err(PlatformError::from)?;

    Ok(())
}

/// Without the `discord` feature there is nothing to connect to.
#[cfg(not(feature = "discord"))]
pub async fn run_bot(_config: &BailiffConfig) -> BailiffResult<()> {
    Err(bailiff::ConfigError::new(
        bailiff::ConfigErrorKind::FeatureDisabled("discord"),
    ))?
}
