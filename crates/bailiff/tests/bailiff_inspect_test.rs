//! Tests for the offline ban inspection helpers.

use bailiff::{
    BanRecordBuilder, BanStore, JsonFilePersistence, ModerationErrorKind, ServerId, UserId,
    ban_lines, check_duration, open_bans, show_ban,
};
use tempfile::TempDir;

async fn seeded(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("bans.json");
    let mut store = BanStore::open(JsonFilePersistence::new(&path)).await.unwrap();
    for (server, user, name) in [(2, 20, "spammer"), (1, 10, "troll")] {
        store
            .put(
                BanRecordBuilder::default()
                    .server_id(ServerId::new(server))
                    .user_id(UserId::new(user))
                    .user_name(name)
                    .moderator_id(UserId::new(100))
                    .moderator_name("alice")
                    .ban_timestamp(0)
                    .duration_seconds(86_400)
                    .reason("flooding")
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();
    }
    path
}

#[tokio::test]
async fn test_list_orders_by_server() {
    let dir = TempDir::new().unwrap();
    let path = seeded(&dir).await;

    let store = open_bans(&path).await.unwrap();
    let lines = ban_lines(&store);
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "1/10 troll (by alice) until 1970-01-02 00:00:00 UTC: flooding"
    );
    assert!(lines[1].starts_with("2/20 spammer"));
}

#[tokio::test]
async fn test_missing_file_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let store = open_bans(&dir.path().join("absent.json")).await.unwrap();
    assert!(ban_lines(&store).is_empty());
}

#[tokio::test]
async fn test_show() {
    let dir = TempDir::new().unwrap();
    let store = open_bans(&seeded(&dir).await).await.unwrap();

    let report = show_ban(&store, ServerId::new(1), UserId::new(10)).unwrap();
    assert!(report.contains("User: troll"));
    assert!(report.contains("Duration: 1 day(s)"));

    let err = show_ban(&store, ServerId::new(1), UserId::new(20)).unwrap_err();
    assert!(matches!(
        err.moderation_kind(),
        Some(ModerationErrorKind::NotTempBanned(_))
    ));
}

#[test]
fn test_check_duration() {
    assert_eq!(check_duration("2w").unwrap(), "2 weeks = 1209600 seconds");
    assert!(check_duration("0d").unwrap().ends_with("(not usable as a ban length)"));
    assert!(check_duration("10m").is_err());
}
