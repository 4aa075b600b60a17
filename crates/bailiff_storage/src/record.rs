//! Ban records and their on-disk shape.

use bailiff_core::{BanKey, ServerId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One active tempban.
///
/// The key fields (`server_id`, `user_id`) identify the ban; everything else
/// is a snapshot taken when the ban was issued.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct BanRecord {
    /// Server the ban applies to
    server_id: ServerId,
    /// Banned user
    user_id: UserId,
    /// Display name of the banned user at ban time
    user_name: String,
    /// Moderator who issued the ban
    moderator_id: UserId,
    /// Display name of the moderator at ban time
    moderator_name: String,
    /// When the ban was issued, epoch seconds
    ban_timestamp: i64,
    /// Ban length in seconds
    duration_seconds: i64,
    /// Free-text reason
    reason: String,
}

impl BanRecord {
    /// Composite key of this record.
    pub fn key(&self) -> BanKey {
        BanKey::new(self.server_id, self.user_id)
    }

    /// Epoch second at which the ban expires.
    pub fn due_timestamp(&self) -> i64 {
        self.ban_timestamp.saturating_add(self.duration_seconds)
    }

    /// Rebuild a record from its persisted form.
    pub fn from_stored(server_id: ServerId, user_id: UserId, stored: StoredBan) -> Self {
        Self {
            server_id,
            user_id,
            user_name: stored.name,
            moderator_id: stored.banned_by.id,
            moderator_name: stored.banned_by.name,
            ban_timestamp: stored.ban_timestamp,
            duration_seconds: stored.duration,
            reason: stored.reason,
        }
    }

    /// Persisted form of this record, without its key.
    pub fn to_stored(&self) -> StoredBan {
        StoredBan {
            name: self.user_name.clone(),
            banned_by: StoredModerator {
                name: self.moderator_name.clone(),
                id: self.moderator_id,
            },
            duration: self.duration_seconds,
            ban_timestamp: self.ban_timestamp,
            reason: self.reason.clone(),
        }
    }
}

/// A ban as written to disk, nested under its server and user IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBan {
    /// Display name of the banned user
    pub name: String,
    /// Moderator who issued the ban
    pub banned_by: StoredModerator,
    /// Ban length in seconds
    pub duration: i64,
    /// When the ban was issued, epoch seconds
    pub ban_timestamp: i64,
    /// Free-text reason
    pub reason: String,
}

/// Moderator snapshot inside a [`StoredBan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredModerator {
    /// Display name
    pub name: String,
    /// User ID
    pub id: UserId,
}

/// Everything a persistence backend reads and writes: server → user → ban.
///
/// Servers may map to an empty table once their last ban is lifted.
pub type BanBook = BTreeMap<ServerId, BTreeMap<UserId, StoredBan>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BanRecord {
        BanRecordBuilder::default()
            .server_id(ServerId::new(10))
            .user_id(UserId::new(20))
            .user_name("troll")
            .moderator_id(UserId::new(30))
            .moderator_name("mod")
            .ban_timestamp(1_000)
            .duration_seconds(86_400)
            .reason("being rude")
            .build()
            .unwrap()
    }

    #[test]
    fn test_due_timestamp() {
        assert_eq!(sample().due_timestamp(), 87_400);
    }

    #[test]
    fn test_stored_field_names() {
        let json = serde_json::to_value(sample().to_stored()).unwrap();
        assert_eq!(json["name"], "troll");
        assert_eq!(json["bannedBy"]["name"], "mod");
        assert_eq!(json["bannedBy"]["id"], "30");
        assert_eq!(json["duration"], 86_400);
        assert_eq!(json["banTimestamp"], 1_000);
        assert_eq!(json["reason"], "being rude");
    }

    #[test]
    fn test_stored_conversion_keeps_everything() {
        let record = sample();
        let back = BanRecord::from_stored(ServerId::new(10), UserId::new(20), record.to_stored());
        assert_eq!(back, record);
    }

    #[test]
    fn test_builder_requires_fields() {
        let err = BanRecordBuilder::default()
            .server_id(ServerId::new(1))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("user_id"));
    }
}
