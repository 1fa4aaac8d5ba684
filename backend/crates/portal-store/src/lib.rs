//! # portal-store
//!
//! Document storage for the portal backend.
//!
//! ## Architecture
//!
//! ```text
//! UserStore / JobStore     ← typed documents, unique indexes, atomic updates
//!     ↓
//! EntityStore<K, V>        ← JSON (de)serialization keyed by StorageKey
//!     ↓
//! StorageBackend           ← generic partitioned K/V operations
//!     ↓
//! RocksDB / in-memory
//! ```

pub mod entity_store;
pub mod jobs;
pub mod memory_impl;
pub mod partitions;
pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod storage_trait;
pub mod users;

pub use entity_store::EntityStore;
pub use jobs::JobStore;
pub use memory_impl::InMemoryBackend;
pub use rocksdb_impl::RocksDBBackend;
pub use rocksdb_init::RocksDbInit;
pub use storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
pub use users::UserStore;

pub use portal_commons::StorageKey;
