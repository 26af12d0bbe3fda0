use anyhow::Result;

use super::web_storage::Storage;

/// Object-safe key/value storage area (DOM's Storage).
pub trait StorageArea: Send + Sync {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the item with the given key.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Clears all items in the storage area.
    fn clear(&self) -> Result<()>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    /// Returns all keys in insertion order.
    fn keys(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageArea for Storage {
    fn get_item(&self, key: &str) -> Option<String> {
        match Storage::get_item(self, key) {
            Ok(value) => value,
            Err(e) => {
                log::error!("getItem({:?}) failed: {}", key, e);
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        Ok(Storage::set_item(self, key, value)?)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        Ok(Storage::remove_item(self, key)?)
    }

    fn clear(&self) -> Result<()> {
        Ok(Storage::clear(self)?)
    }

    fn len(&self) -> usize {
        self.length().unwrap_or_else(|e| {
            log::error!("length failed: {}", e);
            0
        })
    }

    fn keys(&self) -> Vec<String> {
        Storage::keys(self).unwrap_or_else(|e| {
            log::error!("keys failed: {}", e);
            Vec::new()
        })
    }
}
