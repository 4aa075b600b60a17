//! Error types for the Bailiff moderation bot.
//!
//! This crate provides the foundation error types used throughout the Bailiff workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Command-level failures ([`ModerationError`], [`DurationError`]) are recovered at
//! the command boundary and shown to the user. [`StorageError`] is the one kind that
//! escalates, since losing ban state silently is not acceptable.
//!
//! # Examples
//!
//! ```
//! use bailiff_error::{BailiffResult, StorageError, StorageErrorKind};
//!
//! fn save() -> BailiffResult<()> {
//!     Err(StorageError::new(StorageErrorKind::FileWrite("disk full".to_string())))?
//! }
//!
//! assert!(save().unwrap_err().is_storage());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod duration;
mod error;
mod moderation;
mod platform;
mod storage;

pub use config::{ConfigError, ConfigErrorKind};
pub use duration::{DurationError, DurationErrorKind};
pub use error::{BailiffError, BailiffErrorKind, BailiffResult};
pub use moderation::{ModerationError, ModerationErrorKind};
pub use platform::{PlatformError, PlatformErrorKind};
pub use storage::{StorageError, StorageErrorKind};
