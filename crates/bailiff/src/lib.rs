//! Bailiff - a Discord moderation bot.
//!
//! Bailiff hands out temporary bans that lift themselves and puts busy
//! channels into slow mode.
//!
//! # Features
//!
//! - **Tempbans**: `tempban`, `unban` and `banfetch`, persisted to a JSON file
//!   and lifted automatically when they expire
//! - **Slow mode**: per-channel message spacing with moderator exemptions
//! - **Mod channel**: each server can pick where reports and expiries go
//!
//! # Cargo Features
//!
//! - `discord` - Discord bot integration (serenity)
//!
//! # Architecture
//!
//! - `bailiff_error` - Error types
//! - `bailiff_core` - Identifiers, durations, clocks
//! - `bailiff_interface` - The `ModerationPlatform` trait
//! - `bailiff_storage` - Ban records and persistence
//! - `bailiff_scheduler` - The unban queue
//! - `bailiff_rate_limit` - Slow mode
//! - `bailiff_moderation` - Commands, service and dispatcher
//! - `bailiff_social` - Discord integration
//!
//! This crate (`bailiff`) re-exports everything for convenience and adds
//! configuration loading and logging setup for the binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod inspect;
mod logging;

pub use config::{BailiffConfig, BansConfig, BotConfig, LoggingConfig};
pub use inspect::{ban_line, ban_lines, check_duration, open_bans, show_ban};
pub use logging::{default_directive, init_logging};

// Re-export workspace crates
pub use bailiff_core::*;
pub use bailiff_error::*;
pub use bailiff_interface::*;
pub use bailiff_moderation::*;
pub use bailiff_rate_limit::*;
pub use bailiff_scheduler::*;
pub use bailiff_storage::*;

#[cfg(feature = "discord")]
pub use bailiff_social::*;
