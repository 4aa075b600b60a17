//! Duration parsing error types.

/// Why a duration string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DurationErrorKind {
    /// The trailing unit character is not one of `d`, `w`, `y`.
    #[display("Invalid suffix in '{}'", _0)]
    InvalidSuffix(String),
    /// The part before the suffix is not an integer, or the result overflows.
    #[display("Invalid magnitude in '{}'", _0)]
    InvalidMagnitude(String),
}

impl DurationErrorKind {
    /// Message shown to the moderator who typed the duration.
    pub fn user_message(&self) -> String {
        match self {
            DurationErrorKind::InvalidSuffix(_) => {
                "Invalid suffix. Please provide some of them : d, w, y".to_string()
            }
            DurationErrorKind::InvalidMagnitude(input) => {
                format!("'{}' is not a valid duration. Try something like 3d, 2w or 1y.", input)
            }
        }
    }
}

/// Duration error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_getters::Getters)]
#[display("Duration Error: {} at line {} in {}", kind, line, file)]
pub struct DurationError {
    kind: DurationErrorKind,
    line: u32,
    file: &'static str,
}

impl DurationError {
    /// Create a new duration error with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use bailiff_error::{DurationError, DurationErrorKind};
    ///
    /// let err = DurationError::new(DurationErrorKind::InvalidSuffix("3x".to_string()));
    /// assert!(matches!(err.kind(), DurationErrorKind::InvalidSuffix(_)));
    /// ```
    #[track_caller]
    pub fn new(kind: DurationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
