//! Moderation command error types.

use crate::DurationErrorKind;

/// Reasons a moderation command is rejected.
///
/// None of these are fatal; the command handler turns them into a chat reply
/// via [`ModerationErrorKind::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModerationErrorKind {
    /// The duration argument could not be parsed.
    #[display("Invalid duration: {}", _0)]
    InvalidDuration(DurationErrorKind),

    /// The target already has an active tempban in this server.
    #[display("User {} is already banned", _0)]
    AlreadyBanned(String),

    /// No tempban exists for the named user.
    #[display("User {} is not tempbanned", _0)]
    NotTempBanned(String),

    /// No ban has ever been recorded for this server.
    #[display("Server is not registered in the ban list")]
    ServerNotRegistered,

    /// A tempban was requested without a reason.
    #[display("Ban reason is empty")]
    EmptyReason,

    /// The parsed duration is zero or negative.
    #[display("Ban duration must be positive")]
    NonPositiveDuration,

    /// The slow mode delay is not a non-negative integer.
    #[display("Invalid slow mode delay: {}", _0)]
    InvalidDelay(String),

    /// A user or channel reference could not be parsed.
    #[display("Invalid target: {}", _0)]
    InvalidTarget(String),

    /// The issuer lacks the permission the command needs.
    #[display("Permission denied for command: {}", _0)]
    PermissionDenied(String),

    /// The command name is not recognized.
    #[display("Unknown command: {}", _0)]
    UnknownCommand(String),

    /// A required argument was not supplied.
    #[display("Missing required argument '{}' for command '{}'", arg_name, command)]
    MissingArgument {
        /// Command being parsed
        command: String,
        /// Name of the missing argument
        arg_name: String,
    },
}

impl ModerationErrorKind {
    /// Message shown in chat to the moderator who issued the command.
    pub fn user_message(&self) -> String {
        match self {
            ModerationErrorKind::InvalidDuration(kind) => kind.user_message(),
            ModerationErrorKind::AlreadyBanned(_) => "User already banned.".to_string(),
            ModerationErrorKind::NotTempBanned(_) => {
                "This user is not tempbanned. Maybe banned forever, who knows.".to_string()
            }
            ModerationErrorKind::ServerNotRegistered => {
                "This server is not registered in the ban list.".to_string()
            }
            ModerationErrorKind::EmptyReason => "Please provide a reason for the ban.".to_string(),
            ModerationErrorKind::NonPositiveDuration => {
                "Are you kidding me ? Could you provide some valid duration ?".to_string()
            }
            ModerationErrorKind::InvalidDelay(_) => "You must provide a valid number.".to_string(),
            ModerationErrorKind::InvalidTarget(target) => {
                format!("I could not make sense of '{}'. Use a mention or an ID.", target)
            }
            ModerationErrorKind::PermissionDenied(_) => {
                "You are not allowed to use this command.".to_string()
            }
            ModerationErrorKind::UnknownCommand(name) => format!("Unknown command: {}", name),
            ModerationErrorKind::MissingArgument { command, arg_name } => {
                format!("Usage: {} is missing <{}>.", command, arg_name)
            }
        }
    }
}

/// Moderation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Moderation Error: {} at line {} in {}", kind, line, file)]
pub struct ModerationError {
    kind: ModerationErrorKind,
    line: u32,
    file: &'static str,
}

impl ModerationError {
    /// Create a new moderation error with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use bailiff_error::{ModerationError, ModerationErrorKind};
    ///
    /// let err = ModerationError::new(ModerationErrorKind::NonPositiveDuration);
    /// assert_eq!(err.kind(), &ModerationErrorKind::NonPositiveDuration);
    /// ```
    #[track_caller]
    pub fn new(kind: ModerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ModerationErrorKind {
        &self.kind
    }
}

impl From<DurationErrorKind> for ModerationError {
    #[track_caller]
    fn from(kind: DurationErrorKind) -> Self {
        ModerationError::new(ModerationErrorKind::InvalidDuration(kind))
    }
}
