//! Non-durable storage backends for tests and headless contexts.

use super::{KeyValueStore, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// In-memory map backend.
///
/// Clones share one underlying map, so a test can keep a handle and inspect
/// what a store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Backend that stores nothing: reads are always empty, writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl KeyValueStore for NullStore {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}
