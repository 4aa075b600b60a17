//! Chat platform boundary for the Bailiff moderation bot.
//!
//! The moderation core never talks to Discord directly. Everything it needs
//! from the outside world (sending and deleting messages, banning and
//! unbanning, resolving users, servers and channels, and deciding whether a
//! message author bypasses slow mode) goes through [`ModerationPlatform`].
//!
//! Implementations:
//! - `bailiff_social::DiscordPlatform` talks to Discord through serenity
//! - [`RecordingPlatform`] records every call in memory, for tests and dry runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod platforms;
mod traits;
mod types;

pub use platforms::{PlatformCall, RecordingPlatform};
pub use traits::{ModerationPlatform, PlatformResult};
pub use types::{IncomingMessage, Permission, PlatformChannel, PlatformServer, PlatformUser};
