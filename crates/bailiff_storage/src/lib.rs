//! Tempban record storage for the Bailiff moderation bot.
//!
//! [`BanStore`] is the single owner of active tempban records. Every mutation
//! is written through a [`BanPersistence`] backend before it returns, and is
//! rolled back in memory if the write fails, so the in-memory view never
//! drifts from what a restart would load.
//!
//! # Backends
//!
//! - [`JsonFilePersistence`]: pretty-printed JSON file, atomic temp file + rename
//! - [`MemoryPersistence`]: in-memory, for tests and dry runs
//!
//! # Example
//!
//! ```
//! use bailiff_core::{ServerId, UserId};
//! use bailiff_storage::{BanRecordBuilder, BanStore, MemoryPersistence};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut store = BanStore::open(MemoryPersistence::new()).await.unwrap();
//!
//! let record = BanRecordBuilder::default()
//!     .server_id(ServerId::new(1))
//!     .user_id(UserId::new(2))
//!     .user_name("troll")
//!     .moderator_id(UserId::new(3))
//!     .moderator_name("mod")
//!     .ban_timestamp(1_000)
//!     .duration_seconds(86_400)
//!     .reason("spam")
//!     .build()
//!     .unwrap();
//!
//! store.put(record).await.unwrap();
//! assert_eq!(store.find_by_name(ServerId::new(1), "troll"), Some(UserId::new(2)));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod json;
mod memory;
mod persistence;
mod record;
mod store;

pub use json::JsonFilePersistence;
pub use memory::MemoryPersistence;
pub use persistence::BanPersistence;
pub use record::{BanBook, BanRecord, BanRecordBuilder, StoredBan, StoredModerator};
pub use store::BanStore;
