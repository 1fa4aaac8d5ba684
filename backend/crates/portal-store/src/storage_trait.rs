//! Storage backend abstraction for pluggable storage implementations.
//!
//! The portal keeps its documents in named partitions:
//! - **RocksDB**: Partition = Column Family
//! - **In-Memory**: Partition = ordered map namespace
//!
//! ## Example Usage
//!
//! ```rust
//! use portal_store::{InMemoryBackend, Partition, StorageBackend};
//!
//! let backend = InMemoryBackend::new();
//! let partition = Partition::new("users");
//! backend.create_partition(&partition).unwrap();
//! backend.put(&partition, b"u1", b"{}").unwrap();
//! assert_eq!(backend.get(&partition, b"u1").unwrap(), Some(b"{}".to_vec()));
//! ```

use std::fmt;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Partition (column family, namespace) not found
    PartitionNotFound(String),

    /// Generic I/O error from underlying storage
    IoError(String),

    /// Serialization/deserialization error
    SerializationError(String),

    /// Unique constraint violation; carries the indexed field name
    UniqueConstraintViolation(String),

    /// A conditional update found the document in an unexpected state
    ConditionFailed(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PartitionNotFound(p) => write!(f, "Partition not found: {}", p),
            StorageError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StorageError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::UniqueConstraintViolation(msg) => {
                write!(f, "Unique constraint violation: {}", msg)
            },
            StorageError::ConditionFailed(msg) => write!(f, "Condition failed: {}", msg),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Represents a logical partition of data within a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    name: String,
}

impl Partition {
    /// Creates a new partition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the partition name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Partition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Represents a single operation in a batch transaction.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Insert or update a key-value pair
    Put {
        partition: Partition,
        key: Vec<u8>,
        value: Vec<u8>,
    },

    /// Delete a key
    Delete { partition: Partition, key: Vec<u8> },
}

/// Trait for pluggable storage backend implementations.
///
/// Implementations must be thread-safe (Send + Sync) to allow concurrent access.
/// All methods are synchronous; async callers go through `spawn_blocking`.
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key. Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair, replacing any existing value.
    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()>;

    /// Deletes a key. Returns `Ok(())` even if the key doesn't exist.
    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()>;

    /// Executes multiple operations atomically: all or none are applied.
    fn batch(&self, operations: Vec<Operation>) -> Result<()>;

    /// Returns (key, value) pairs in key order, optionally restricted to a
    /// key prefix and capped at `limit` entries.
    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Checks if a partition exists.
    fn partition_exists(&self, partition: &Partition) -> bool;

    /// Creates a new partition. Idempotent.
    fn create_partition(&self, partition: &Partition) -> Result<()>;
}
