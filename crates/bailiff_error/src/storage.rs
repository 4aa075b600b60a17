//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the data directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write the ban file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read the ban file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Ban data could not be encoded
    #[display("Failed to serialize ban data: {}", _0)]
    Serialization(String),
    /// Ban file exists but is not valid ban data
    #[display("Failed to parse ban data: {}", _0)]
    Deserialization(String),
    /// A ban record is missing required fields
    #[display("Invalid ban record: {}", _0)]
    InvalidRecord(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use bailiff_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead("/data/bans.json".to_string()));
/// assert!(format!("{}", err).contains("Failed to read file"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
