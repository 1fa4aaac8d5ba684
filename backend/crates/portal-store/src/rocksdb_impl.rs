//! RocksDB implementation of the StorageBackend trait.
//!
//! Partitions map to RocksDB column families. The database is opened in
//! multi-threaded column family mode so partitions can be created through a
//! shared handle.

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use rocksdb::{BoundColumnFamily, DBWithThreadMode, Direction, IteratorMode, MultiThreaded, Options, WriteBatch};
use std::sync::Arc;

/// Database handle type shared by the backend and [`crate::RocksDbInit`].
pub type PortalDb = DBWithThreadMode<MultiThreaded>;

/// RocksDB implementation of the StorageBackend trait.
///
/// ## Example
///
/// ```rust,ignore
/// use portal_store::{RocksDbInit, RocksDBBackend, StorageBackend, Partition};
///
/// let db = RocksDbInit::new("/tmp/portal/rocksdb").open().unwrap();
/// let backend = RocksDBBackend::new(db);
///
/// let partition = Partition::new("users");
/// backend.put(&partition, b"key1", b"value1").unwrap();
/// assert_eq!(backend.get(&partition, b"key1").unwrap(), Some(b"value1".to_vec()));
/// ```
pub struct RocksDBBackend {
    db: Arc<PortalDb>,
}

impl RocksDBBackend {
    pub fn new(db: Arc<PortalDb>) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn db(&self) -> &Arc<PortalDb> {
        &self.db
    }

    fn get_cf(&self, partition: &Partition) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))
    }
}

impl StorageBackend for RocksDBBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.get_cf(partition)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        self.db
            .delete_cf(&cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn batch(&self, operations: Vec<Operation>) -> Result<()> {
        let mut batch = WriteBatch::default();

        for op in operations {
            match op {
                Operation::Put {
                    partition,
                    key,
                    value,
                } => {
                    let cf = self.get_cf(&partition)?;
                    batch.put_cf(&cf, key, value);
                },
                Operation::Delete { partition, key } => {
                    let cf = self.get_cf(&partition)?;
                    batch.delete_cf(&cf, key);
                },
            }
        }

        self.db
            .write(batch)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let cf = self.get_cf(partition)?;

        let mode = match prefix {
            Some(p) => IteratorMode::From(p, Direction::Forward),
            None => IteratorMode::Start,
        };

        let mut results = Vec::new();
        for item in self.db.iterator_cf(&cf, mode) {
            if limit.is_some_and(|n| results.len() >= n) {
                break;
            }

            let (key, value) = item.map_err(|e| StorageError::IoError(e.to_string()))?;
            if let Some(p) = prefix {
                if !key.starts_with(p) {
                    break;
                }
            }
            results.push((key.to_vec(), value.to_vec()));
        }

        Ok(results)
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.db.cf_handle(partition.name()).is_some()
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        if self.partition_exists(partition) {
            return Ok(());
        }

        self.db
            .create_cf(partition.name(), &Options::default())
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        log::debug!("Created column family '{}'", partition.name());
        Ok(())
    }
}
