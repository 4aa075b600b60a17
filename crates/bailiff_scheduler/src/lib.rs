//! Unban scheduling for the Bailiff moderation bot.
//!
//! [`UnbanQueue`] is an indexed min-priority queue of pending unbans. Events
//! are ordered by due time, ties broken by insertion order, and each
//! `(server, user)` pair has at most one pending event, so a manual unban can
//! cancel its event in logarithmic time.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod event;
mod queue;

pub use event::UnbanEvent;
pub use queue::UnbanQueue;
