//! Pending unban events.

use bailiff_core::{BanKey, ServerId, UserId};

/// An unban that becomes due at `due_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct UnbanEvent {
    /// Epoch second at which the ban expires
    due_timestamp: i64,
    /// Server the ban applies to
    server_id: ServerId,
    /// Banned user
    user_id: UserId,
    /// Display name captured at ban time, for logs
    user_name: String,
}

impl UnbanEvent {
    /// Create an event.
    pub fn new(
        due_timestamp: i64,
        server_id: ServerId,
        user_id: UserId,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            due_timestamp,
            server_id,
            user_id,
            user_name: user_name.into(),
        }
    }

    /// Key of the ban this event lifts.
    pub fn key(&self) -> BanKey {
        BanKey::new(self.server_id, self.user_id)
    }
}
