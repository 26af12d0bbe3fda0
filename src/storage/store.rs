use indexmap::IndexMap;

use super::local::sqlite_store::SqliteStore;
use super::session::in_memory::MemoryStore;
use super::types::Locator;
use crate::errors::StorageError;

/// Ordered, synchronous key/value persistence underneath a storage area.
///
/// Replacing the value of an existing key must keep its position; the order
/// returned by [`keys`](Self::keys), [`key_at`](Self::key_at) and
/// [`entries`](Self::entries) is insertion order.
pub trait BackingStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Inserts or replaces `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn delete(&mut self, key: &str) -> Result<(), StorageError>;

    fn clear(&mut self) -> Result<(), StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Key at position `index`, or `None` when out of range.
    fn key_at(&self, index: usize) -> Result<Option<String>, StorageError>;

    fn entries(&self) -> Result<IndexMap<String, String>, StorageError>;

    fn count(&self) -> Result<usize, StorageError>;

    /// Whether the data outlives the store.
    fn is_persistent(&self) -> bool;
}

/// Opens the store a locator points at.
pub fn open(locator: &Locator) -> Result<Box<dyn BackingStore>, StorageError> {
    match locator {
        Locator::Empty | Locator::Memory => Ok(Box::new(MemoryStore::new())),
        Locator::Path(path) => Ok(Box::new(SqliteStore::open(path)?)),
    }
}
