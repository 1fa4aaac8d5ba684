//! Opens the RocksDB instance with every portal column family present.

use crate::partitions;
use crate::rocksdb_impl::PortalDb;
use anyhow::Result;
use rocksdb::{ColumnFamilyDescriptor, Options};
use std::path::Path;
use std::sync::Arc;

pub struct RocksDbInit {
    db_path: String,
}

impl RocksDbInit {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Open or create the database, creating any missing portal partitions.
    pub fn open(&self) -> Result<Arc<PortalDb>> {
        let path = Path::new(&self.db_path);
        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.increase_parallelism(num_cpus::get() as i32);

        // Keep column families that already exist on disk
        let mut existing = match PortalDb::list_cf(&db_opts, path) {
            Ok(cfs) if !cfs.is_empty() => cfs,
            _ => vec!["default".to_string()],
        };

        for name in partitions::ALL.iter() {
            if !existing.iter().any(|n| n == name) {
                existing.push((*name).to_string());
            }
        }

        let descriptors: Vec<_> = existing
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = PortalDb::open_cf_descriptors(&db_opts, path, descriptors)?;
        log::info!(
            "Opened RocksDB at {} with {} column families",
            self.db_path,
            existing.len()
        );
        Ok(Arc::new(db))
    }
}
