//! Core data types for the Bailiff moderation bot.
//!
//! This crate holds the small, dependency-light pieces every other crate needs:
//! - [`BanDuration`] and [`parse_duration`] for suffixed ban lengths ("3d", "2w", "1y")
//! - Snowflake identifier newtypes ([`ServerId`], [`UserId`], [`ChannelId`], [`MessageId`])
//! - The [`Clock`] abstraction so scheduling can be driven by a fake clock in tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod duration;
mod ids;

pub use clock::{Clock, ManualClock, SystemClock, now_unix_secs};
pub use duration::{BanDuration, DurationUnit, parse_duration};
pub use ids::{BanKey, ChannelId, MessageId, ServerId, UserId};
