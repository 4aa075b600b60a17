//! Configuration and startup error types.

/// What went wrong while configuring the bot.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged.
    #[display("Failed to build configuration: {}", _0)]
    Load(String),
    /// The merged configuration does not fit the expected shape.
    #[display("Failed to parse configuration: {}", _0)]
    Parse(String),
    /// A required environment variable is absent.
    #[display("{} is not set", _0)]
    MissingVariable(String),
    /// The tracing subscriber could not be installed.
    #[display("Failed to install logger: {}", _0)]
    Logging(String),
    /// The binary was built without a cargo feature the command needs.
    #[display("bailiff was built without the {} feature; rebuild with --features {}", _0, _0)]
    FeatureDisabled(&'static str),
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_getters::Getters)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new configuration error with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use bailiff_error::{ConfigError, ConfigErrorKind};
    ///
    /// let err = ConfigError::new(ConfigErrorKind::MissingVariable("DISCORD_TOKEN".to_string()));
    /// assert_eq!(err.kind().to_string(), "DISCORD_TOKEN is not set");
    /// ```
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
