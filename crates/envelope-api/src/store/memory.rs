//! [`MemoryStore`]: process-local record store.

use std::collections::BTreeMap;

use envelope::EncodedRecord;
use parking_lot::RwLock;

use super::{RecordStore, StoreError};

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, EncodedRecord>>,
}

impl MemoryStore {
    /// Create a new, empty [`MemoryStore`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, record: &EncodedRecord) -> Result<i64, StoreError> {
        let mut records = self.records.write();
        let id = records.keys().next_back().map_or(1, |last| last + 1);
        records.insert(id, record.clone());
        Ok(id)
    }

    fn get(&self, id: i64) -> Result<Option<EncodedRecord>, StoreError> {
        Ok(self.records.read().get(&id).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().len())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
