//! Offline views of persisted tempbans, used by the `bans` and
//! `check-duration` subcommands.

use bailiff_core::{BanDuration, ServerId, UserId};
use bailiff_error::{BailiffResult, ModerationError, ModerationErrorKind};
use bailiff_moderation::{BanReport, format_timestamp};
use bailiff_storage::{BanRecord, BanStore, JsonFilePersistence};
use std::path::Path;
use tracing::instrument;

/// Open the ban file at `path` read-only.
///
/// A missing file is an empty store.
///
/// # Errors
///
/// Returns a storage error if the file exists but cannot be read or parsed.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn open_bans(path: &Path) -> BailiffResult<BanStore> {
    BanStore::open(JsonFilePersistence::new(path)).await
}

/// One line per tempban, ordered by server then user.
pub fn ban_lines(store: &BanStore) -> Vec<String> {
    store.all().map(ban_line).collect()
}

/// `server/user name (mod) until <time>: reason`
pub fn ban_line(record: &BanRecord) -> String {
    format!(
        "{}/{} {} (by {}) until {}: {}",
        record.server_id(),
        record.user_id(),
        record.user_name(),
        record.moderator_name(),
        format_timestamp(record.due_timestamp()),
        record.reason(),
    )
}

/// The full report for one record.
///
/// # Errors
///
/// `NotTempBanned` if no record exists for the pair.
pub fn show_ban(store: &BanStore, server_id: ServerId, user_id: UserId) -> BailiffResult<String> {
    let record = store.get(server_id, user_id).ok_or_else(|| {
        ModerationError::new(ModerationErrorKind::NotTempBanned(user_id.to_string()))
    })?;
    Ok(BanReport::new(record, "the command line").render())
}

/// Parse a duration and describe it.
///
/// # Errors
///
/// Returns the duration error for malformed input.
pub fn check_duration(text: &str) -> BailiffResult<String> {
    let duration = BanDuration::parse(text)?;
    let mut line = format!("{} = {} seconds", duration.describe(), duration.seconds());
    if duration.seconds() <= 0 {
        line.push_str(" (not usable as a ban length)");
    }
    Ok(line)
}
