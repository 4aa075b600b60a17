//! JSON file backend.

use crate::{BanBook, BanPersistence};
use async_trait::async_trait;
use bailiff_error::{StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Stores the ban book as a pretty-printed JSON file.
///
/// Writes go to a sibling `*.tmp` file which is then renamed over the real
/// one, so a crash mid-write leaves the previous file intact. The parent
/// directory is created on first save.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Use the file at `path`. Nothing is touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the ban file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BanPersistence for JsonFilePersistence {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<BanBook, StorageError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No ban file yet, starting empty");
                return Ok(BanBook::new());
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))));
            }
        };

        if text.trim().is_empty() {
            return Ok(BanBook::new());
        }

        let book: BanBook = serde_json::from_str(&text).map_err(|e| {
            StorageError::new(StorageErrorKind::Deserialization(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;

        tracing::debug!(servers = book.len(), "Loaded ban file");
        Ok(book)
    }

    #[tracing::instrument(skip(self, book), fields(path = %self.path.display(), servers = book.len()))]
    async fn save(&self, book: &BanBook) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "rename {} to {}: {}",
                    temp_path.display(),
                    self.path.display(),
                    e
                )))
            })?;

        tracing::debug!("Saved ban file");
        Ok(())
    }
}
