//! Bot configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from bailiff.toml)
//! - `~/.config/bailiff/bailiff.toml`
//! - `./bailiff.toml`
//! - A file named on the command line
//! - `BAILIFF_*` environment variables, `__` between table and key

use bailiff_core::UserId;
use bailiff_error::{BailiffError, BailiffResult, ConfigError, ConfigErrorKind};
use bailiff_rate_limit::SlowModeConfig;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../bailiff.toml");

/// The `[bot]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    /// Command prefix
    pub prefix: String,
    /// Bot owner, 0 when unset
    pub owner_id: u64,
    /// Roles that bypass slow mode
    pub mod_roles: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            owner_id: 0,
            mod_roles: vec!["moderator".to_string(), "admin".to_string()],
        }
    }
}

/// The `[bans]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BansConfig {
    /// JSON file holding active tempbans
    pub data_file: PathBuf,
    /// Seconds between unban dispatch ticks
    pub poll_interval_secs: u64,
}

impl Default for BansConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/bans/bans.json"),
            poll_interval_secs: 5,
        }
    }
}

/// The `[logging]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSON lines instead of human-readable output
    pub json: bool,
}

/// Top-level Bailiff configuration.
///
/// # Example
///
/// ```no_run
/// use bailiff::BailiffConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BailiffConfig::load(None)?;
/// println!("Bans are kept in {}", config.bans.data_file.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BailiffConfig {
    /// Command handling
    #[serde(default)]
    pub bot: BotConfig,
    /// Tempban persistence and dispatch
    #[serde(default)]
    pub bans: BansConfig,
    /// Channels slowed at startup
    #[serde(default)]
    pub slow_mode: SlowModeConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BailiffConfig {
    /// Load configuration from every source, in precedence order.
    ///
    /// `explicit` is a file passed on the command line; unlike the other
    /// files it must exist.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read or the
    /// merged result does not deserialize.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> BailiffResult<Self> {
        debug!("Loading configuration with precedence: env > --config > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bailiff/bailiff.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bailiff").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BAILIFF")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load the bundled defaults overlaid with one file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> BailiffResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Load the bundled defaults overlaid with TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not valid TOML or has
    /// values of the wrong type.
    pub fn from_toml_str(text: &str) -> BailiffResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> BailiffResult<Self> {
        builder
            .build()
            .map_err(|e| BailiffError::from(ConfigError::new(ConfigErrorKind::Load(e.to_string()))))?
            .try_deserialize()
            .map_err(|e| BailiffError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string()))))
    }

    /// The configured bot owner, if any.
    pub fn owner(&self) -> Option<UserId> {
        (self.bot.owner_id != 0).then_some(UserId::new(self.bot.owner_id))
    }

    /// Time between unban dispatch ticks.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.bans.poll_interval_secs.max(1))
    }

    /// Time between slow mode prunes.
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.slow_mode.prune_interval_secs.max(1))
    }
}
