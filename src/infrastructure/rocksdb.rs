use crate::domain::ports::SnapshotStore;
use crate::domain::snapshot::{PtoSnapshot, STORAGE_KEY};
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for tool state, keyed like browser local storage.
pub const CF_TOOLS: &str = "tools";

/// A persistent snapshot store backed by RocksDB.
///
/// Snapshots live in their own column family under `STORAGE_KEY`.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_tools = ColumnFamilyDescriptor::new(CF_TOOLS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_tools])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_TOOLS).ok_or_else(|| {
            ToolError::IoError(std::io::Error::other("Tools column family not found"))
        })
    }
}

#[async_trait]
impl SnapshotStore for RocksDBStore {
    async fn load(&self) -> Result<Option<PtoSnapshot>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, STORAGE_KEY)? {
            Some(bytes) => PtoSnapshot::from_json(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &PtoSnapshot) -> Result<()> {
        let cf = self.cf()?;
        let value = snapshot.to_json()?;
        self.db.put_cf(cf, STORAGE_KEY, value)?;
        Ok(())
    }
}
