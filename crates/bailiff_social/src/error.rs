//! Discord-specific error types.

use bailiff_error::{PlatformError, PlatformErrorKind};
use derive_getters::Getters;

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Serenity API error (e.g., HTTP error, gateway error, rate limit).
    #[display("Serenity API error: {_0}")]
    SerenityError(String),

    /// Connection to Discord gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Bot token is missing or empty.
    #[display("Invalid or missing bot token")]
    InvalidToken,

    /// Bot lacks required permissions for an operation.
    #[display("Insufficient permissions: {_0}")]
    InsufficientPermissions(String),
}

/// Discord error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    kind: DiscordErrorKind,
    line: u32,
    file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    ///
    /// # Example
    ///
    /// ```
    /// use bailiff_social::{DiscordError, DiscordErrorKind};
    ///
    /// let err = DiscordError::new(DiscordErrorKind::InvalidToken);
    /// assert!(err.to_string().contains("bot token"));
    /// ```
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<DiscordError> for PlatformError {
    #[track_caller]
    fn from(err: DiscordError) -> Self {
        let kind = match err.kind {
            DiscordErrorKind::InsufficientPermissions(what) => {
                PlatformErrorKind::InsufficientPermissions(what)
            }
            other => PlatformErrorKind::Api(other.to_string()),
        };
        PlatformError::new(kind)
    }
}

#[cfg(feature = "discord")]
impl From<serenity::Error> for DiscordError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        use serenity::all::ModelError;

        match &err {
            serenity::Error::Model(ModelError::InvalidPermissions { .. }) => {
                DiscordError::new(DiscordErrorKind::InsufficientPermissions(err.to_string()))
            }
            serenity::Error::Gateway(_) => {
                DiscordError::new(DiscordErrorKind::ConnectionFailed(err.to_string()))
            }
            _ => DiscordError::new(DiscordErrorKind::SerenityError(err.to_string())),
        }
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;
