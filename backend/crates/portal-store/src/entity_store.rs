//! Typed entity storage keyed by [`StorageKey`] identifiers.
//!
//! ```text
//! EntityStore<K, V>        ← typed CRUD with JSON values (this file)
//!     ↓
//! StorageBackend           ← generic K/V operations (storage_trait.rs)
//! ```

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use portal_commons::StorageKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Hard cap on entries materialized by [`EntityStore::scan_all`].
const MAX_SCAN_LIMIT: usize = 100_000;

/// Strongly-typed CRUD over one partition.
///
/// Implementors supply the backend and partition name; serialization
/// defaults to JSON.
pub trait EntityStore<K, V>
where
    K: StorageKey,
    V: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    fn backend(&self) -> &Arc<dyn StorageBackend>;

    fn partition(&self) -> &str;

    fn serialize(&self, entity: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(entity).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<V> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Stores an entity, replacing any existing value under `key`.
    fn put(&self, key: &K, entity: &V) -> Result<()> {
        let partition = Partition::new(self.partition());
        let value = self.serialize(entity)?;
        self.backend().put(&partition, &key.storage_key(), &value)
    }

    /// Builds the batch operation equivalent of [`EntityStore::put`], for
    /// callers that write an entity together with its index entries.
    fn put_operation(&self, key: &K, entity: &V) -> Result<Operation> {
        Ok(Operation::Put {
            partition: Partition::new(self.partition()),
            key: key.storage_key(),
            value: self.serialize(entity)?,
        })
    }

    /// Retrieves an entity by key. Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &K) -> Result<Option<V>> {
        let partition = Partition::new(self.partition());
        match self.backend().get(&partition, &key.storage_key())? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Deletes an entity by key (idempotent).
    fn delete(&self, key: &K) -> Result<()> {
        let partition = Partition::new(self.partition());
        self.backend().delete(&partition, &key.storage_key())
    }

    /// Scans all entities in the partition, in key order.
    fn scan_all(&self) -> Result<Vec<(K, V)>> {
        let partition = Partition::new(self.partition());
        let rows = self
            .backend()
            .scan(&partition, None, Some(MAX_SCAN_LIMIT))?;

        if rows.len() == MAX_SCAN_LIMIT {
            log::warn!(
                "Scan of '{}' reached max limit of {} entries, stopping early",
                self.partition(),
                MAX_SCAN_LIMIT
            );
        }

        rows.into_iter()
            .map(|(key_bytes, value_bytes)| {
                let key = K::from_storage_key(&key_bytes).map_err(StorageError::SerializationError)?;
                Ok((key, self.deserialize(&value_bytes)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryBackend;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    struct NoteStore {
        backend: Arc<dyn StorageBackend>,
    }

    impl EntityStore<String, Note> for NoteStore {
        fn backend(&self) -> &Arc<dyn StorageBackend> {
            &self.backend
        }

        fn partition(&self) -> &str {
            "notes"
        }
    }

    fn store() -> NoteStore {
        NoteStore {
            backend: Arc::new(InMemoryBackend::with_partitions(&["notes"])),
        }
    }

    #[test]
    fn test_put_get_delete() {
        let store = store();
        let key = "n1".to_string();
        let note = Note {
            text: "hello".to_string(),
        };

        store.put(&key, &note).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(note));

        store.delete(&key).unwrap();
        assert_eq!(store.get(&key).unwrap(), None);
    }

    #[test]
    fn test_scan_all_returns_typed_keys() {
        let store = store();
        for i in 0..3 {
            store
                .put(
                    &format!("n{}", i),
                    &Note {
                        text: i.to_string(),
                    },
                )
                .unwrap();
        }

        let all = store.scan_all().unwrap();
        let keys: Vec<_> = all.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["n0", "n1", "n2"]);
    }

    #[test]
    fn test_corrupt_value_is_serialization_error() {
        let store = store();
        store
            .backend()
            .put(&Partition::new("notes"), b"bad", b"not json")
            .unwrap();
        let result = store.get(&"bad".to_string());
        assert!(matches!(result, Err(StorageError::SerializationError(_))));
    }
}
