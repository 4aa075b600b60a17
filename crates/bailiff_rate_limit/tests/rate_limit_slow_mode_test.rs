//! Slow mode decisions.

use bailiff_core::{ChannelId, UserId};
use bailiff_rate_limit::{SlowMode, SlowModeVerdict};

const CHANNEL: ChannelId = ChannelId::new(100);
const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);

fn slowed(seconds: u64) -> SlowMode {
    let mut slow = SlowMode::new();
    slow.set_slow(CHANNEL, seconds);
    slow
}

#[test]
fn test_second_message_inside_window_is_suppressed() {
    let mut slow = slowed(10);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 0, false), SlowModeVerdict::Allow);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 9, false), SlowModeVerdict::Suppress);
}

#[test]
fn test_second_message_after_window_is_allowed() {
    let mut slow = slowed(10);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 0, false), SlowModeVerdict::Allow);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 11, false), SlowModeVerdict::Allow);
}

#[test]
fn test_window_edge_is_inclusive() {
    let mut slow = slowed(10);
    slow.on_message(CHANNEL, ALICE, 0, false);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 10, false), SlowModeVerdict::Suppress);
}

#[test]
fn test_suppressed_messages_still_reset_the_window() {
    let mut slow = slowed(10);
    slow.on_message(CHANNEL, ALICE, 0, false);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 8, false), SlowModeVerdict::Suppress);
    // 16 is more than 10 after the first message but only 8 after the suppressed one.
    assert_eq!(slow.on_message(CHANNEL, ALICE, 16, false), SlowModeVerdict::Suppress);
    assert_eq!(slow.on_message(CHANNEL, ALICE, 27, false), SlowModeVerdict::Allow);
}

#[test]
fn test_exempt_never_suppressed() {
    let mut slow = slowed(10);
    for t in 0..20 {
        assert_eq!(slow.on_message(CHANNEL, ALICE, t, true), SlowModeVerdict::Allow);
    }
    assert_eq!(slow.tracked(), 0);
}

#[test]
fn test_members_and_channels_are_independent() {
    let mut slow = slowed(10);
    let other = ChannelId::new(200);
    slow.set_slow(other, 10);

    slow.on_message(CHANNEL, ALICE, 0, false);
    assert_eq!(slow.on_message(CHANNEL, BOB, 1, false), SlowModeVerdict::Allow);
    assert_eq!(slow.on_message(other, ALICE, 2, false), SlowModeVerdict::Allow);
}
