//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use envelope::{Envelope, MasterKey};

use crate::store::{MemoryStore, RecordStore};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so Axum can clone the state per request.
/// The master key is read-only after startup and shared without locking.
#[derive(Clone)]
pub struct AppState {
    /// The configured master key, or `None` when `MASTER_KEY` is unset.
    pub master_key: Option<Arc<MasterKey>>,
    /// Where encrypted records are kept.
    pub store: Arc<dyn RecordStore>,
    /// Protect/reveal over the OS CSPRNG.
    pub envelope: Envelope,
}

impl AppState {
    /// Create a new [`AppState`] from an optional master key and a store.
    pub fn new(master_key: Option<MasterKey>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            master_key: master_key.map(Arc::new),
            store,
            envelope: Envelope::new(),
        }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with no master key and an empty in-memory
    /// store, suitable for tests.
    fn default() -> Self {
        Self::new(None, Arc::new(MemoryStore::new()))
    }
}
