//! Pick the storage backend named in the config.
//!
//! `Auto` tries IndexedDB and falls back to memory.

use std::rc::Rc;
use dialogue_core::ports::StoragePort;
use dialogue_types::config::StorageBackendType;
use super::{IndexedDbStorage, MemoryStorage};

/// Open the requested backend. Never fails: an unavailable IndexedDB
/// degrades to the in-memory store with a warning.
pub async fn open_storage(backend: &StorageBackendType) -> Rc<dyn StoragePort> {
    if *backend == StorageBackendType::Memory {
        log::info!("Storage backend: memory (configured)");
        return Rc::new(MemoryStorage::new());
    }

    match IndexedDbStorage::open().await {
        Ok(idb) => {
            log::info!("Storage backend: IndexedDB");
            Rc::new(idb)
        }
        Err(e) => {
            log::warn!("IndexedDB unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}
