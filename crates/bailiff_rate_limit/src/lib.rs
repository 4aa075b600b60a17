//! Slow mode: per-channel message rate limiting.
//!
//! A channel in slow mode has a threshold in seconds. A member who posts
//! again within that many seconds of their previous message has the new
//! message suppressed. Exempt members (owner, moderators, anyone allowed to
//! manage messages) are never limited.
//!
//! State lives only in memory; thresholds can be seeded from configuration
//! with [`SlowModeConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;

pub use config::SlowModeConfig;
pub use limiter::{SlowMode, SlowModeVerdict};
