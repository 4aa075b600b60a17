//! The ban record store.

use crate::{BanBook, BanPersistence, BanRecord};
use bailiff_core::{BanKey, ServerId, UserId};
use bailiff_error::{BailiffResult, ModerationError, ModerationErrorKind, StorageError};
use std::collections::BTreeMap;
use tracing::{debug, error, instrument};

/// Owner of all active tempban records.
///
/// At most one record exists per `(server, user)`. Every mutating call saves
/// the full book through the backend before returning; if the save fails the
/// change is undone and the [`StorageError`] is returned.
#[derive(Debug)]
pub struct BanStore {
    records: BTreeMap<ServerId, BTreeMap<UserId, BanRecord>>,
    persistence: Box<dyn BanPersistence>,
}

impl BanStore {
    /// Load the store from `persistence`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read or parsed.
    #[instrument(skip(persistence))]
    pub async fn open<P>(persistence: P) -> BailiffResult<Self>
    where
        P: BanPersistence + 'static,
    {
        let book = persistence.load().await?;
        let records = book
            .into_iter()
            .map(|(server_id, users)| {
                let users = users
                    .into_iter()
                    .map(|(user_id, stored)| {
                        (user_id, BanRecord::from_stored(server_id, user_id, stored))
                    })
                    .collect();
                (server_id, users)
            })
            .collect();

        let store = Self {
            records,
            persistence: Box::new(persistence),
        };
        debug!(records = store.len(), "Opened ban store");
        Ok(store)
    }

    /// Add a record.
    ///
    /// # Errors
    ///
    /// - `AlreadyBanned` if the user already has a record in that server
    /// - a storage error if the save fails (the record is not kept)
    #[instrument(skip(self, record), fields(server_id = %record.server_id(), user_id = %record.user_id()))]
    pub async fn put(&mut self, record: BanRecord) -> BailiffResult<()> {
        let server_id = *record.server_id();
        let user_id = *record.user_id();

        if self.contains(server_id, user_id) {
            return Err(ModerationError::new(ModerationErrorKind::AlreadyBanned(
                record.user_name().clone(),
            ))
            .into());
        }

        let new_server = !self.records.contains_key(&server_id);
        self.records
            .entry(server_id)
            .or_default()
            .insert(user_id, record);

        if let Err(e) = self.persist().await {
            if new_server {
                self.records.remove(&server_id);
            } else if let Some(users) = self.records.get_mut(&server_id) {
                users.remove(&user_id);
            }
            return Err(e.into());
        }

        debug!("Stored ban record");
        Ok(())
    }

    /// The record for `(server_id, user_id)`, if any.
    pub fn get(&self, server_id: ServerId, user_id: UserId) -> Option<&BanRecord> {
        self.records.get(&server_id)?.get(&user_id)
    }

    /// Whether a record exists for `(server_id, user_id)`.
    pub fn contains(&self, server_id: ServerId, user_id: UserId) -> bool {
        self.get(server_id, user_id).is_some()
    }

    /// Whether any ban was ever recorded for `server_id`.
    ///
    /// Servers stay registered after their last ban is lifted.
    pub fn has_server(&self, server_id: ServerId) -> bool {
        self.records.contains_key(&server_id)
    }

    /// Find a banned user by the display name captured at ban time.
    ///
    /// Matches exactly. If several users in the server share the name, the
    /// one with the lowest user ID wins; callers must live with that ambiguity.
    pub fn find_by_name(&self, server_id: ServerId, name: &str) -> Option<UserId> {
        self.records
            .get(&server_id)?
            .values()
            .find(|record| record.user_name() == name)
            .map(|record| *record.user_id())
    }

    /// Remove a record, returning it.
    ///
    /// Removing a record that does not exist is not an error and does not
    /// write anything.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the save fails (the record is kept).
    #[instrument(skip(self))]
    pub async fn remove(
        &mut self,
        server_id: ServerId,
        user_id: UserId,
    ) -> BailiffResult<Option<BanRecord>> {
        let Some(record) = self
            .records
            .get_mut(&server_id)
            .and_then(|users| users.remove(&user_id))
        else {
            return Ok(None);
        };

        if let Err(e) = self.persist().await {
            self.restore(vec![record]);
            return Err(e.into());
        }

        debug!("Removed ban record");
        Ok(Some(record))
    }

    /// Remove several records with a single save.
    ///
    /// Keys without a record are skipped. The removed records are returned in
    /// the order their keys were given.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the save fails (every record is kept).
    #[instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn remove_many(&mut self, keys: &[BanKey]) -> BailiffResult<Vec<BanRecord>> {
        let removed: Vec<BanRecord> = keys
            .iter()
            .filter_map(|key| {
                self.records
                    .get_mut(&key.server_id)
                    .and_then(|users| users.remove(&key.user_id))
            })
            .collect();

        if removed.is_empty() {
            return Ok(removed);
        }

        if let Err(e) = self.persist().await {
            self.restore(removed);
            return Err(e.into());
        }

        debug!(removed = removed.len(), "Removed ban records");
        Ok(removed)
    }

    /// Every record, ordered by server then user.
    pub fn all(&self) -> impl Iterator<Item = &BanRecord> {
        self.records.values().flat_map(|users| users.values())
    }

    /// Every registered server, including those with no active ban.
    pub fn servers(&self) -> impl Iterator<Item = ServerId> + '_ {
        self.records.keys().copied()
    }

    /// Number of active records.
    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    /// Whether there are no active records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The records in their persisted shape.
    pub fn to_book(&self) -> BanBook {
        self.records
            .iter()
            .map(|(server_id, users)| {
                let users = users
                    .iter()
                    .map(|(user_id, record)| (*user_id, record.to_stored()))
                    .collect();
                (*server_id, users)
            })
            .collect()
    }

    fn restore(&mut self, records: Vec<BanRecord>) {
        for record in records {
            self.records
                .entry(*record.server_id())
                .or_default()
                .insert(*record.user_id(), record);
        }
    }

    async fn persist(&self) -> Result<(), StorageError> {
        self.persistence.save(&self.to_book()).await.map_err(|e| {
            error!(error = %e, "Failed to persist ban records, change rolled back");
            e
        })
    }
}
