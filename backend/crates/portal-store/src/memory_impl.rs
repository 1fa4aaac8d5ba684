//! In-memory implementation of the StorageBackend trait.
//!
//! Used by tests and by `storage.backend = "memory"` deployments. Each
//! partition is an ordered map so scans behave like RocksDB iterators.

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

type PartitionMap = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Default)]
pub struct InMemoryBackend {
    partitions: RwLock<HashMap<String, PartitionMap>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with the given partitions already present.
    pub fn with_partitions(names: &[&str]) -> Self {
        let backend = Self::new();
        {
            let mut partitions = backend.partitions.write();
            for name in names {
                partitions.entry(name.to_string()).or_default();
            }
        }
        backend
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        map.remove(key);
        Ok(())
    }

    fn batch(&self, operations: Vec<Operation>) -> Result<()> {
        let mut partitions = self.partitions.write();

        // Validate every partition first so a failing batch applies nothing
        for op in &operations {
            let name = match op {
                Operation::Put { partition, .. } | Operation::Delete { partition, .. } => {
                    partition.name()
                },
            };
            if !partitions.contains_key(name) {
                return Err(StorageError::PartitionNotFound(name.to_string()));
            }
        }

        for op in operations {
            match op {
                Operation::Put {
                    partition,
                    key,
                    value,
                } => {
                    if let Some(map) = partitions.get_mut(partition.name()) {
                        map.insert(key, value);
                    }
                },
                Operation::Delete { partition, key } => {
                    if let Some(map) = partitions.get_mut(partition.name()) {
                        map.remove(&key);
                    }
                },
            }
        }
        Ok(())
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;

        let iter = map
            .iter()
            .filter(|(k, _)| prefix.map(|p| k.starts_with(p)).unwrap_or(true))
            .map(|(k, v)| (k.clone(), v.clone()));

        Ok(match limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        })
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.partitions.read().contains_key(partition.name())
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        self.partitions
            .write()
            .entry(partition.name().to_string())
            .or_default();
        Ok(())
    }
}
