//! In-memory tab-scoped storage
//!
//! Mirrors the browser's `sessionStorage`: every clone of a `MemoryStorage`
//! handle sees the same map, and the data is gone once the last handle drops.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::SessionStorage;
use crate::error::StorageError;
use crate::Result;

pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
    /// Maximum total bytes (keys + values), if limited
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            quota: None,
        }
    }

    /// Create a store that rejects writes once keys and values together
    /// would exceed `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            quota: Some(quota),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let requested = key.len() + value.len();

            if others + requested > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStorage {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            quota: self.quota,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("v2".to_string()));
        assert_eq!(storage.len(), 1);

        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);

        // Removing a missing key is fine
        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("shared", "yes").unwrap();
        assert_eq!(other.get("shared").unwrap(), Some("yes".to_string()));
    }

    #[test]
    fn test_quota() {
        let storage = MemoryStorage::with_quota(10);

        // 1 + 5 bytes
        storage.set("a", "12345").unwrap();

        // Would bring the total to 6 + 6 = 12
        let err = storage.set("b", "12345").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded {
                requested: 6,
                limit: 10,
                ..
            }
        ));
        assert_eq!(storage.get("b").unwrap(), None);

        // Replacing an existing value only counts the new value
        storage.set("a", "123456789").unwrap();
        assert_eq!(storage.get("a").unwrap(), Some("123456789".to_string()));
        assert!(storage.set("a", "1234567890").is_err());
    }
}
