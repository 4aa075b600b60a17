//! In-memory backend.

use crate::{BanBook, BanPersistence};
use async_trait::async_trait;
use bailiff_error::{StorageError, StorageErrorKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Keeps the "persisted" book in memory.
///
/// Clones share the same book, so a test can keep a handle after moving one
/// into a [`BanStore`](crate::BanStore) and inspect what was saved, or flip
/// [`fail_writes`](Self::fail_writes) to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    book: Arc<Mutex<BanBook>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryPersistence {
    /// Start with an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `book` already saved.
    pub fn with_book(book: BanBook) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
            fail_writes: Arc::default(),
        }
    }

    /// Make every subsequent save fail.
    pub fn fail_writes(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Copy of the last saved book.
    pub fn snapshot(&self) -> BanBook {
        self.book.lock().clone()
    }
}

#[async_trait]
impl BanPersistence for MemoryPersistence {
    async fn load(&self) -> Result<BanBook, StorageError> {
        Ok(self.snapshot())
    }

    async fn save(&self, book: &BanBook) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::new(StorageErrorKind::FileWrite(
                "memory backend set to fail".to_string(),
            )));
        }
        *self.book.lock() = book.clone();
        Ok(())
    }
}
