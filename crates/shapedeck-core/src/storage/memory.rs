//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let storage = MemoryStorage::new();

        storage.set("shapes", "[]").unwrap();
        let value = storage.get("shapes").unwrap();

        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_set_replaces() {
        let storage = MemoryStorage::new();

        storage.set("shapes", "old").unwrap();
        storage.set("shapes", "new").unwrap();

        assert_eq!(storage.get("shapes").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();

        storage.set("shapes", "[]").unwrap();
        storage.remove("shapes").unwrap();

        assert!(storage.get("shapes").unwrap().is_none());
        // Removing again is a no-op.
        storage.remove("shapes").unwrap();
    }
}
