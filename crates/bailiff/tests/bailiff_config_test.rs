//! Tests for layered configuration loading.

use bailiff::{BailiffConfig, BailiffErrorKind, ChannelId, ConfigErrorKind, UserId};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_bundled_defaults() {
    let config = BailiffConfig::from_toml_str("").unwrap();
    assert_eq!(config.bot.prefix, "!");
    assert_eq!(config.owner(), None);
    assert_eq!(config.bot.mod_roles, vec!["moderator", "admin"]);
    assert_eq!(config.bans.data_file.to_str(), Some("data/bans/bans.json"));
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert_eq!(config.prune_interval(), Duration::from_secs(300));
    assert!(config.slow_mode.channels.is_empty());
    assert!(!config.logging.json);
}

#[test]
fn test_overrides_keep_unset_defaults() {
    let config = BailiffConfig::from_toml_str(
        r#"
        [bot]
        prefix = "?"
        owner_id = 80351110224678912

        [slow_mode.channels]
        "123" = 10
        "#,
    )
    .unwrap();

    assert_eq!(config.bot.prefix, "?");
    assert_eq!(config.owner(), Some(UserId::new(80351110224678912)));
    assert_eq!(config.bot.mod_roles, vec!["moderator", "admin"]);
    assert_eq!(config.bans.poll_interval_secs, 5);
    assert_eq!(config.slow_mode.channels.get(&ChannelId::new(123)), Some(&10));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(file, "[bans]\npoll_interval_secs = 30\n\n[logging]\njson = true").unwrap();

    let config = BailiffConfig::from_file(file.path()).unwrap();
    assert_eq!(config.poll_interval(), Duration::from_secs(30));
    assert!(config.logging.json);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let err = BailiffConfig::from_file("/definitely/not/here/bailiff.toml").unwrap_err();
    assert!(matches!(
        err.kind(),
        BailiffErrorKind::Config(e) if matches!(e.kind(), ConfigErrorKind::Load(_))
    ));
}

#[test]
fn test_wrong_type_is_an_error() {
    let err = BailiffConfig::from_toml_str("[bans]\npoll_interval_secs = \"soon\"").unwrap_err();
    assert!(matches!(
        err.kind(),
        BailiffErrorKind::Config(e) if matches!(e.kind(), ConfigErrorKind::Parse(_))
    ));
    assert!(err.to_string().contains("Failed to parse configuration"));
}
