use indexmap::IndexMap;

use crate::errors::StorageError;
use crate::storage::store::BackingStore;

// In memory storage, dropped together with its area.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // IndexMap::insert keeps the slot of an existing key
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.map.shift_remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.map.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.map.keys().cloned().collect())
    }

    fn key_at(&self, index: usize) -> Result<Option<String>, StorageError> {
        Ok(self.map.get_index(index).map(|(k, _)| k.clone()))
    }

    fn entries(&self) -> Result<IndexMap<String, String>, StorageError> {
        Ok(self.map.clone())
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.map.len())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
