//! Top-level error wrapper types.

use crate::{
    ConfigError, DurationError, ModerationError, ModerationErrorKind, PlatformError, StorageError,
};

/// Every error condition a Bailiff operation can surface.
///
/// # Examples
///
/// ```
/// use bailiff_error::{BailiffError, ConfigError, ConfigErrorKind};
///
/// let err: BailiffError =
///     ConfigError::new(ConfigErrorKind::MissingVariable("DISCORD_TOKEN".to_string())).into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BailiffErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Duration parsing error
    #[from(DurationError)]
    Duration(DurationError),
    /// Persisted ban state could not be read or written
    #[from(StorageError)]
    Storage(StorageError),
    /// A moderation command was rejected
    #[from(ModerationError)]
    Moderation(ModerationError),
    /// The chat platform refused or failed an operation
    #[from(PlatformError)]
    Platform(PlatformError),
}

/// Bailiff error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bailiff_error::{BailiffResult, ModerationError, ModerationErrorKind};
///
/// fn might_fail() -> BailiffResult<()> {
///     Err(ModerationError::new(ModerationErrorKind::EmptyReason))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert_eq!(err.user_message(), "Please provide a reason for the ban.");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bailiff Error: {}", _0)]
pub struct BailiffError(Box<BailiffErrorKind>);

impl BailiffError {
    /// Create a new error from a kind.
    pub fn new(kind: BailiffErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BailiffErrorKind {
        &self.0
    }

    /// Whether this error concerns persisted state and must be escalated.
    pub fn is_storage(&self) -> bool {
        matches!(self.kind(), BailiffErrorKind::Storage(_))
    }

    /// The moderation error kind, if this is a rejected command.
    pub fn moderation_kind(&self) -> Option<&ModerationErrorKind> {
        match self.kind() {
            BailiffErrorKind::Moderation(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Text suitable for showing to the person who issued a command.
    ///
    /// Command rejections get their friendly wording; anything else is reported
    /// generically so internal paths and line numbers stay out of chat.
    pub fn user_message(&self) -> String {
        match self.kind() {
            BailiffErrorKind::Moderation(e) => e.kind().user_message(),
            BailiffErrorKind::Duration(e) => e.kind().user_message(),
            BailiffErrorKind::Platform(e) => format!("The platform refused the request: {}", e.kind()),
            BailiffErrorKind::Storage(_) => {
                "Ban data could not be saved. An operator has been notified.".to_string()
            }
            BailiffErrorKind::Config(e) => format!("Configuration problem: {}", e.kind()),
        }
    }
}

// Generic From implementation for any type that converts to BailiffErrorKind
impl<T> From<T> for BailiffError
where
    T: Into<BailiffErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Bailiff operations.
pub type BailiffResult<T> = std::result::Result<T, BailiffError>;
