//! Moderation commands and the unban dispatcher for the Bailiff bot.
//!
//! [`ModerationService`] ties the pieces together: it parses chat
//! [`Command`]s, applies slow mode, records tempbans in a
//! [`BanStore`](bailiff_storage::BanStore), schedules their expiry in an
//! [`UnbanQueue`](bailiff_scheduler::UnbanQueue) and talks to the chat
//! platform through [`ModerationPlatform`](bailiff_interface::ModerationPlatform).
//! [`UnbanDispatcher`] drives the expiry side on a timer.
//!
//! # Commands
//!
//! | Command | Permission | Effect |
//! |---|---|---|
//! | `tempban <user> <duration> <reason...>` | ban members | ban now, unban when the duration elapses |
//! | `unban <username>` | ban members | lift a tempban early |
//! | `banfetch <username>` | ban members | post a [`BanReport`] |
//! | `modchan <channel>` | ban members | send reports to that channel |
//! | `slowmode <seconds>` | manage messages | slow the current channel |
//! | `slowoff` | manage messages | stop slowing the current channel |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod dispatch;
mod report;
mod service;

pub use command::{Command, parse_channel_mention, parse_user_mention};
pub use dispatch::{DispatchMessage, DispatcherHandle, UnbanDispatcher};
pub use report::{BanReport, format_timestamp};
pub use service::{BAN_CONFIRMATION, MessageOutcome, ModerationService, ModerationState};
