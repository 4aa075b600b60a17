//! The slow mode limiter.

use crate::SlowModeConfig;
use bailiff_core::{ChannelId, UserId};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

/// What to do with an incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SlowModeVerdict {
    /// Let the message through
    Allow,
    /// Delete the message
    Suppress,
}

/// Per-channel thresholds and the last time each member spoke.
///
/// The decision for a message is made from the member's *previous* message,
/// and the member's timestamp is then moved to the new message even when it
/// is suppressed. Someone who keeps posting inside the window therefore stays
/// muted until they pause for longer than the threshold.
///
/// # Example
///
/// ```
/// use bailiff_core::{ChannelId, UserId};
/// use bailiff_rate_limit::{SlowMode, SlowModeVerdict};
///
/// let channel = ChannelId::new(1);
/// let user = UserId::new(2);
/// let mut slow = SlowMode::new();
/// slow.set_slow(channel, 10);
///
/// assert_eq!(slow.on_message(channel, user, 0, false), SlowModeVerdict::Allow);
/// assert_eq!(slow.on_message(channel, user, 9, false), SlowModeVerdict::Suppress);
/// assert_eq!(slow.on_message(channel, user, 20, false), SlowModeVerdict::Allow);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlowMode {
    slow_duration: HashMap<ChannelId, u64>,
    last_spoke: HashMap<(ChannelId, UserId), i64>,
}

impl SlowMode {
    /// No channel slowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow the channels listed in `config`.
    pub fn from_config(config: &SlowModeConfig) -> Self {
        let mut slow = Self::new();
        for (channel, seconds) in &config.channels {
            slow.set_slow(*channel, *seconds);
        }
        slow
    }

    /// Set the threshold for `channel`. Zero turns slow mode off.
    #[instrument(skip(self))]
    pub fn set_slow(&mut self, channel: ChannelId, seconds: u64) {
        if seconds == 0 {
            self.slow_duration.remove(&channel);
            self.last_spoke.retain(|(c, _), _| *c != channel);
            debug!("Slow mode disabled");
        } else {
            self.slow_duration.insert(channel, seconds);
            debug!("Slow mode enabled");
        }
    }

    /// Threshold for `channel`, zero when not slowed.
    pub fn slow_for(&self, channel: ChannelId) -> u64 {
        self.slow_duration.get(&channel).copied().unwrap_or(0)
    }

    /// Decide on a message from `user` in `channel` at `now`.
    ///
    /// Exempt authors and unslowed channels are always allowed and leave no
    /// trace.
    pub fn on_message(
        &mut self,
        channel: ChannelId,
        user: UserId,
        now: i64,
        is_exempt: bool,
    ) -> SlowModeVerdict {
        if is_exempt {
            return SlowModeVerdict::Allow;
        }

        let threshold = self.slow_for(channel);
        if threshold == 0 {
            return SlowModeVerdict::Allow;
        }

        let verdict = match self.last_spoke.insert((channel, user), now) {
            Some(previous) if within(now, previous, threshold) => SlowModeVerdict::Suppress,
            _ => SlowModeVerdict::Allow,
        };

        trace!(%channel, %user, now, %verdict, "Slow mode verdict");
        verdict
    }

    /// Drop entries that can no longer cause a suppression: those in channels
    /// no longer slowed and those older than their channel's threshold.
    ///
    /// Returns the number of entries dropped.
    pub fn prune(&mut self, now: i64) -> usize {
        let before = self.last_spoke.len();
        let slow_duration = &self.slow_duration;
        self.last_spoke.retain(|(channel, _), last| {
            slow_duration
                .get(channel)
                .is_some_and(|threshold| within(now, *last, *threshold))
        });

        let dropped = before - self.last_spoke.len();
        if dropped > 0 {
            debug!(dropped, remaining = self.last_spoke.len(), "Pruned slow mode entries");
        }
        dropped
    }

    /// Slowed channels and their thresholds.
    pub fn channels(&self) -> impl Iterator<Item = (ChannelId, u64)> + '_ {
        self.slow_duration.iter().map(|(c, s)| (*c, *s))
    }

    /// Number of remembered `(channel, user)` timestamps.
    pub fn tracked(&self) -> usize {
        self.last_spoke.len()
    }
}

fn within(now: i64, previous: i64, threshold: u64) -> bool {
    let elapsed = now.saturating_sub(previous);
    elapsed <= i64::try_from(threshold).unwrap_or(i64::MAX)
}
