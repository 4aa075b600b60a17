//! Unban dispatcher loop and storage escalation.

mod common;

use bailiff_core::UserId;
use bailiff_interface::PlatformCall;
use bailiff_moderation::{DispatchMessage, UnbanDispatcher};
use bailiff_storage::{BanBook, MemoryPersistence, StoredBan, StoredModerator};
use common::*;
use std::collections::BTreeMap;
use std::time::Duration;

fn stored(name: &str, ban_timestamp: i64) -> StoredBan {
    StoredBan {
        name: name.to_string(),
        banned_by: StoredModerator {
            name: "alice".to_string(),
            id: MODERATOR,
        },
        duration: 86_400,
        ban_timestamp,
        reason: "spam".to_string(),
    }
}

#[tokio::test]
async fn test_run_now_then_shutdown() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!tempban <@200> 1d spam").await;
    h.clock.set(87_400);

    let handle = UnbanDispatcher::spawn(
        h.service.clone(),
        Duration::from_secs(3_600),
        Duration::from_secs(3_600),
    );
    assert!(handle.run_now().await);
    handle.shutdown().await;

    assert_eq!(h.platform.unbans(), vec![(SERVER, TROLL)]);
    assert!(h.service.ban_record(SERVER, TROLL).await.is_none());
}

#[tokio::test]
async fn test_run_now_through_sender() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!tempban <@200> 1d spam").await;
    h.clock.set(87_400);

    let handle = UnbanDispatcher::spawn(
        h.service.clone(),
        Duration::from_secs(3_600),
        Duration::from_secs(3_600),
    );
    let tx = handle.sender();
    tx.send(DispatchMessage::RunNow).await.unwrap();
    handle.shutdown().await;

    assert_eq!(h.platform.unbans(), vec![(SERVER, TROLL)]);
    assert!(h.service.ban_record(SERVER, TROLL).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_interval_lifts_expired_bans() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!tempban <@200> 1d spam").await;

    let handle = UnbanDispatcher::spawn(
        h.service.clone(),
        Duration::from_secs(5),
        Duration::from_secs(300),
    );

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert!(h.platform.unbans().is_empty());

    h.clock.set(87_400);
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(h.platform.unbans(), vec![(SERVER, TROLL)]);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_drains_but_keeps_records() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!tempban <@200> 1y spam").await;

    let handle = UnbanDispatcher::spawn(
        h.service.clone(),
        Duration::from_secs(5),
        Duration::from_secs(300),
    );
    handle.shutdown().await;

    assert_eq!(h.service.pending_unbans().await, 0);
    assert!(h.service.ban_record(SERVER, TROLL).await.is_some());
    assert!(h.platform.unbans().is_empty());

    assert_eq!(h.service.reload_schedule().await, 1);
    assert_eq!(h.service.pending_unbans().await, 1);
}

#[tokio::test]
async fn test_storage_failure_on_ban_is_escalated() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!modchan <#11>").await;
    h.backend.fail_writes(true);

    let err = h
        .service
        .handle_message(&message(MODERATOR, "!tempban <@200> 1d spam"))
        .await
        .unwrap_err();
    assert!(err.is_storage());

    assert!(
        h.platform
            .messages_in(MOD_CHANNEL)
            .iter()
            .any(|m| m.contains("could not be saved"))
    );
    assert!(h.platform.calls().iter().all(|c| !matches!(c, PlatformCall::Ban { .. })));
    assert_eq!(h.service.pending_unbans().await, 0);
}

#[tokio::test]
async fn test_storage_failure_on_tick_keeps_events() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!tempban <@200> 1d spam").await;
    h.backend.fail_writes(true);

    assert!(h.service.run_due(87_400).await.unwrap_err().is_storage());
    assert_eq!(h.service.pending_unbans().await, 1);
    assert!(h.service.ban_record(SERVER, TROLL).await.is_some());
    assert!(h.platform.unbans().is_empty());

    h.backend.fail_writes(false);
    assert_eq!(h.service.run_due(87_400).await.unwrap(), 1);
    assert_eq!(h.platform.unbans(), vec![(SERVER, TROLL)]);
}

#[tokio::test]
async fn test_failed_platform_unban_is_not_retried() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!tempban <@200> 1d spam").await;
    h.platform.fail_unbans(true);

    assert_eq!(h.service.run_due(87_400).await.unwrap(), 1);
    assert!(h.service.ban_record(SERVER, TROLL).await.is_none());

    h.platform.fail_unbans(false);
    assert_eq!(h.service.run_due(87_400).await.unwrap(), 0);
    assert!(h.platform.unbans().is_empty());
}

#[tokio::test]
async fn test_expiry_is_reported_in_mod_channel() {
    let h = Harness::new().await;
    h.say(MODERATOR, "!modchan 11").await;
    h.say(MODERATOR, "!tempban <@200> 1d spam").await;

    h.service.run_due(87_400).await.unwrap();
    assert!(
        h.platform
            .messages_in(MOD_CHANNEL)
            .last()
            .unwrap()
            .starts_with("troll's tempban has expired")
    );
}

#[tokio::test]
async fn test_unknown_user_abandons_unban() {
    let stranger = UserId::new(999);
    let mut book = BanBook::new();
    book.insert(
        SERVER,
        BTreeMap::from([(TROLL, stored("troll", 1_000)), (stranger, stored("ghost", 0))]),
    );
    let h = Harness::with_backend(MemoryPersistence::with_book(book)).await;
    h.say(MODERATOR, "!modchan 11").await;
    assert_eq!(h.service.pending_unbans().await, 2);

    assert_eq!(h.service.run_due(86_400).await.unwrap(), 1);
    assert!(h.platform.unbans().is_empty());
    assert!(h.service.ban_record(SERVER, stranger).await.is_none());
    assert!(h.platform.messages_in(MOD_CHANNEL).iter().all(|m| !m.contains("ghost")));

    assert_eq!(h.service.run_due(87_400).await.unwrap(), 1);
    assert_eq!(h.platform.unbans(), vec![(SERVER, TROLL)]);
    assert!(h.backend.snapshot()[&SERVER].is_empty());
}
