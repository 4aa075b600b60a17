//! Indexed priority queue of unban events.

use crate::UnbanEvent;
use bailiff_core::{BanKey, ServerId, UserId};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

type Slot = (i64, u64);

/// Pending unbans ordered by `(due_timestamp, insertion sequence)`.
///
/// # Example
///
/// ```
/// use bailiff_core::{ServerId, UserId};
/// use bailiff_scheduler::{UnbanEvent, UnbanQueue};
///
/// let mut queue = UnbanQueue::new();
/// queue.schedule(UnbanEvent::new(100, ServerId::new(1), UserId::new(2), "a"));
/// queue.schedule(UnbanEvent::new(50, ServerId::new(1), UserId::new(3), "b"));
///
/// assert_eq!(queue.next_due(), Some(50));
/// let due = queue.pop_due(75);
/// assert_eq!(due.len(), 1);
/// assert_eq!(due[0].user_name(), "b");
/// ```
#[derive(Debug, Default)]
pub struct UnbanQueue {
    events: BTreeMap<Slot, UnbanEvent>,
    index: HashMap<BanKey, Slot>,
    next_seq: u64,
}

impl UnbanQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event.
    ///
    /// An event already in the past is returned by the next [`pop_due`](Self::pop_due).
    /// If the same `(server, user)` is already scheduled, the old event is
    /// replaced and returned.
    pub fn schedule(&mut self, event: UnbanEvent) -> Option<UnbanEvent> {
        let key = event.key();
        let replaced = self.cancel(key.server_id, key.user_id);

        let slot = (*event.due_timestamp(), self.next_seq);
        self.next_seq += 1;

        debug!(
            server_id = %key.server_id,
            user_id = %key.user_id,
            due = slot.0,
            "Scheduled unban"
        );
        self.index.insert(key, slot);
        self.events.insert(slot, event);
        replaced
    }

    /// Remove the pending event for `(server_id, user_id)`, if there is one.
    pub fn cancel(&mut self, server_id: ServerId, user_id: UserId) -> Option<UnbanEvent> {
        let slot = self.index.remove(&BanKey::new(server_id, user_id))?;
        let event = self.events.remove(&slot);
        trace!(%server_id, %user_id, "Cancelled unban");
        event
    }

    /// Remove and return every event due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: i64) -> Vec<UnbanEvent> {
        let pending = match now.checked_add(1) {
            Some(bound) => self.events.split_off(&(bound, 0)),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.events, pending);

        due.into_values()
            .inspect(|event| {
                self.index.remove(&event.key());
            })
            .collect()
    }

    /// Due time of the earliest event.
    pub fn next_due(&self) -> Option<i64> {
        self.events.keys().next().map(|(due, _)| *due)
    }

    /// Whether `key` has a pending event.
    pub fn contains(&self, key: &BanKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every pending event, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.events.len();
        self.events.clear();
        self.index.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(due: i64, user: u64) -> UnbanEvent {
        UnbanEvent::new(due, ServerId::new(1), UserId::new(user), format!("u{user}"))
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut queue = UnbanQueue::new();
        queue.schedule(event(10, 3));
        queue.schedule(event(10, 1));
        queue.schedule(event(10, 2));

        let order: Vec<u64> = queue
            .pop_due(10)
            .iter()
            .map(|e| e.user_id().get())
            .collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut queue = UnbanQueue::new();
        queue.schedule(event(10, 1));
        let old = queue.schedule(event(99, 1));

        assert_eq!(old.map(|e| *e.due_timestamp()), Some(10));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(99));
        assert!(queue.pop_due(50).is_empty());
    }

    #[test]
    fn test_cancel_absent_is_none() {
        let mut queue = UnbanQueue::new();
        assert!(queue.cancel(ServerId::new(1), UserId::new(1)).is_none());
    }

    #[test]
    fn test_pop_due_clears_index() {
        let mut queue = UnbanQueue::new();
        queue.schedule(event(5, 1));
        queue.pop_due(5);

        let key = BanKey::new(ServerId::new(1), UserId::new(1));
        assert!(!queue.contains(&key));
        assert!(queue.cancel(ServerId::new(1), UserId::new(1)).is_none());
    }

    #[test]
    fn test_pop_due_at_extreme_time() {
        let mut queue = UnbanQueue::new();
        queue.schedule(event(i64::MAX, 1));
        assert_eq!(queue.pop_due(i64::MAX).len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut queue = UnbanQueue::new();
        queue.schedule(event(1, 1));
        queue.schedule(event(2, 2));
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.next_due(), None);
    }
}
