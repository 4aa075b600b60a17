//! Slow mode through the moderation service.

mod common;

use bailiff_core::ChannelId;
use bailiff_error::ModerationErrorKind;
use bailiff_interface::{Permission, PlatformCall};
use bailiff_moderation::MessageOutcome;
use bailiff_rate_limit::SlowMode;
use common::*;

#[tokio::test]
async fn test_slowmode_suppresses_fast_posters() {
    let h = Harness::new().await;
    assert_eq!(
        h.say(MODERATOR, "!slowmode 10").await,
        MessageOutcome::Completed("slowmode".to_string())
    );
    assert_eq!(h.service.slow_for(CHANNEL).await, 10);
    assert_eq!(
        h.platform.messages_in(CHANNEL),
        vec!["This channel is now in :snail: mode. (10 seconds)."]
    );

    assert_eq!(h.say(MEMBER, "hello").await, MessageOutcome::Ignored);
    h.clock.advance(9);
    assert_eq!(h.say(MEMBER, "hello again").await, MessageOutcome::Suppressed);
    assert!(matches!(
        h.platform.calls().last(),
        Some(PlatformCall::DeleteMessage { channel: CHANNEL, .. })
    ));

    h.clock.advance(11);
    assert_eq!(h.say(MEMBER, "patient now").await, MessageOutcome::Ignored);
}

#[tokio::test]
async fn test_moderators_are_exempt() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!slowmode 60").await;
    for _ in 0..5 {
        assert_eq!(h.say(MODERATOR, "announcement").await, MessageOutcome::Ignored);
    }
}

#[tokio::test]
async fn test_slowoff() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!slowmode 10").await;
    h.say(MEMBER, "one").await;

    assert_eq!(
        h.say(MODERATOR, "!slowoff").await,
        MessageOutcome::Completed("slowoff".to_string())
    );
    assert_eq!(h.service.slow_for(CHANNEL).await, 0);
    assert_eq!(h.say(MEMBER, "two").await, MessageOutcome::Ignored);
}

#[tokio::test]
async fn test_slowed_command_still_runs() {
    let h = Harness::with_platform(platform().with_permission(MEMBER, Permission::BanMembers)).await;
    h.say(MODERATOR, "!slowmode 10").await;
    h.say(MEMBER, "hi").await;
    h.clock.advance(5);

    let command = message(MEMBER, "!tempban <@200> 1d spam");
    assert_eq!(
        h.service.handle_message(&command).await.unwrap(),
        MessageOutcome::Completed("tempban".to_string())
    );
    let deletes = h
        .platform
        .calls()
        .into_iter()
        .filter(|c| matches!(c, PlatformCall::DeleteMessage { message, .. } if message == command.id()))
        .count();
    assert_eq!(deletes, 1);
    assert!(h.service.ban_record(SERVER, TROLL).await.is_some());

    h.clock.advance(1);
    assert_eq!(h.say(MEMBER, "still here").await, MessageOutcome::Suppressed);
}

#[tokio::test]
async fn test_unknown_words_after_prefix_are_left_alone() {
    let h = Harness::new().await;
    assert_eq!(h.say(MEMBER, "!kick someone").await, MessageOutcome::Ignored);
    assert_eq!(h.say(MODERATOR, "!help").await, MessageOutcome::Ignored);
    assert!(h.platform.calls().is_empty());

    h.say(MODERATOR, "!slowmode 10").await;
    h.say(MEMBER, "hi").await;
    assert_eq!(h.say(MEMBER, "!roll d20").await, MessageOutcome::Suppressed);
}

#[tokio::test]
async fn test_slowmode_delay_must_be_digits() {
    let h = Harness::new().await;
    for delay in ["ten", "-5", "1.5", "+3"] {
        assert_eq!(
            h.say(MODERATOR, &format!("!slowmode {delay}")).await,
            MessageOutcome::Rejected(ModerationErrorKind::InvalidDelay(delay.to_string()))
        );
    }
    assert_eq!(h.service.slow_for(CHANNEL).await, 0);
    assert_eq!(
        h.platform.messages_in(CHANNEL)[0],
        "You must provide a valid number."
    );
}

#[tokio::test]
async fn test_members_cannot_change_slow_mode() {
    let h = Harness::new().await;
    assert_eq!(
        h.say(MEMBER, "!slowmode 10").await,
        MessageOutcome::Rejected(ModerationErrorKind::PermissionDenied("slowmode".to_string()))
    );
}

#[tokio::test]
async fn test_seeded_channels_and_pruning() {
    let h = Harness::new().await;
    let mut seeded = SlowMode::new();
    seeded.set_slow(CHANNEL, 30);

    let service = bailiff_moderation::ModerationService::new(
        h.platform.clone(),
        bailiff_storage::BanStore::open(h.backend.clone()).await.unwrap(),
        std::sync::Arc::new(h.clock.clone()),
    )
    .with_slow_mode(seeded);

    assert_eq!(service.slow_for(CHANNEL).await, 30);
    assert_eq!(service.slow_for(ChannelId::new(12)).await, 0);

    service.handle_message(&message(MEMBER, "hi")).await.unwrap();
    assert_eq!(service.prune_slow_mode(1_030).await, 0);
    assert_eq!(service.prune_slow_mode(1_031).await, 1);
}
