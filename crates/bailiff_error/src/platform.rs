//! Chat platform error types.

use derive_getters::Getters;

/// Platform error variants.
///
/// Raised by implementations of the moderation platform trait when a call to the
/// chat service fails. These are fatal to the one operation only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// User could not be resolved by ID.
    #[display("User not found: {_0}")]
    UserNotFound(u64),

    /// Server (guild) could not be resolved by ID.
    #[display("Server not found: {_0}")]
    ServerNotFound(u64),

    /// Channel could not be resolved by ID.
    #[display("Channel not found: {_0}")]
    ChannelNotFound(u64),

    /// Bot lacks required permissions for an operation.
    #[display("Insufficient permissions: {_0}")]
    InsufficientPermissions(String),

    /// Underlying API call failed (HTTP error, gateway error, rate limit).
    #[display("API error: {_0}")]
    Api(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    kind: PlatformErrorKind,
    line: u32,
    file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use bailiff_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::UserNotFound(42));
    /// assert_eq!(err.kind(), &PlatformErrorKind::UserNotFound(42));
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
