//! Persistence backend trait.

use crate::BanBook;
use async_trait::async_trait;
use bailiff_error::StorageError;

/// Reads and writes the whole ban book.
///
/// The store always saves the complete book, so implementations do not need
/// to support partial updates. `save` must be all-or-nothing: after a failed
/// save the previously saved book is still what `load` returns.
#[async_trait]
pub trait BanPersistence: Send + Sync + std::fmt::Debug {
    /// Load the persisted book. A backend with nothing saved yet returns an
    /// empty book.
    async fn load(&self) -> Result<BanBook, StorageError>;

    /// Replace the persisted book.
    async fn save(&self, book: &BanBook) -> Result<(), StorageError>;
}
