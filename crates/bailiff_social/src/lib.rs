//! Discord integration for the Bailiff moderation bot.
//!
//! Available with the `discord` feature:
//! - [`DiscordPlatform`] implements
//!   [`ModerationPlatform`](bailiff_interface::ModerationPlatform) over the
//!   Discord HTTP API
//! - [`BailiffHandler`] feeds gateway messages to a
//!   [`ModerationService`](bailiff_moderation::ModerationService)
//! - [`BailiffBot`] owns the serenity client
//!
//! Error types and the role matching rules are always available.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod roles;

#[cfg(feature = "discord")]
mod discord;

pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use roles::{is_mod_role, normalize_roles};

#[cfg(feature = "discord")]
pub use discord::{BailiffBot, BailiffHandler, DiscordPlatform};
