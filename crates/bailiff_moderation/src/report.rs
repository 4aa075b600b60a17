//! Ban report rendering.

use bailiff_storage::BanRecord;
use chrono::{DateTime, Utc};

/// Read-only summary of one tempban, as shown by `banfetch`.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct BanReport {
    user_name: String,
    moderator_name: String,
    duration_days: f64,
    reason: String,
    banned_at: i64,
    unban_at: i64,
    requested_by: String,
}

impl BanReport {
    /// Summarize `record` for the moderator named `requested_by`.
    pub fn new(record: &BanRecord, requested_by: impl Into<String>) -> Self {
        Self {
            user_name: record.user_name().clone(),
            moderator_name: record.moderator_name().clone(),
            duration_days: *record.duration_seconds() as f64 / 86_400.0,
            reason: record.reason().clone(),
            banned_at: *record.ban_timestamp(),
            unban_at: record.due_timestamp(),
            requested_by: requested_by.into(),
        }
    }

    /// Plain text form posted in chat.
    pub fn render(&self) -> String {
        let days = (self.duration_days * 100.0).round() / 100.0;
        format!(
            "Ban report :hammer:\n\
             User: {}\n\
             Mod: {}\n\
             Duration: {} day(s)\n\
             Reason: {}\n\
             Banned: {}\n\
             Unban: {}\n\
             Requested by {}",
            self.user_name,
            self.moderator_name,
            days,
            self.reason,
            format_timestamp(self.banned_at),
            format_timestamp(self.unban_at),
            self.requested_by,
        )
    }
}

impl std::fmt::Display for BanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Epoch seconds as `YYYY-MM-DD HH:MM:SS UTC`, or the raw number if out of range.
pub fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bailiff_core::{ServerId, UserId};
    use bailiff_storage::BanRecordBuilder;

    #[test]
    fn test_render() {
        let record = BanRecordBuilder::default()
            .server_id(ServerId::new(1))
            .user_id(UserId::new(2))
            .user_name("troll")
            .moderator_id(UserId::new(3))
            .moderator_name("alice")
            .ban_timestamp(0)
            .duration_seconds(129_600)
            .reason("spam")
            .build()
            .unwrap();

        let report = BanReport::new(&record, "bob");
        assert_eq!(*report.duration_days(), 1.5);
        assert_eq!(
            report.render(),
            "Ban report :hammer:\n\
             User: troll\n\
             Mod: alice\n\
             Duration: 1.5 day(s)\n\
             Reason: spam\n\
             Banned: 1970-01-01 00:00:00 UTC\n\
             Unban: 1970-01-02 12:00:00 UTC\n\
             Requested by bob"
        );
    }

    #[test]
    fn test_out_of_range_timestamp_falls_back() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}
