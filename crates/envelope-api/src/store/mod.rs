//! Persistence for encrypted records.
//!
//! Stores hold [`EncodedRecord`]s as opaque base64 strings keyed by an integer
//! id. They never see plaintext or unwrapped keys and never interpret what they
//! hold.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use envelope::EncodedRecord;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The SQLite backend reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A thread-safe record store.
pub trait RecordStore: Send + Sync {
    /// Persist `record` and return its newly assigned id (ids start at 1).
    fn insert(&self, record: &EncodedRecord) -> Result<i64, StoreError>;

    /// Fetch the record stored under `id`, if any.
    fn get(&self, id: i64) -> Result<Option<EncodedRecord>, StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, StoreError>;

    /// Short backend name for logging.
    fn backend(&self) -> &'static str;
}

/// Open the store selected by configuration: SQLite at `database_path`, or an
/// in-memory store when no path is set.
///
/// # Errors
///
/// Returns [`StoreError::Sqlite`] if the database cannot be opened or migrated.
pub fn open(database_path: Option<&str>) -> Result<Arc<dyn RecordStore>, StoreError> {
    Ok(match database_path {
        Some(path) => Arc::new(SqliteStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    })
}
