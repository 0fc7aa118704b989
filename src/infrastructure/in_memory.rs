use crate::domain::ports::SnapshotStore;
use crate::domain::snapshot::{PtoSnapshot, STORAGE_KEY};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory key/value store for calculator snapshots.
///
/// Keeps the serialized JSON rather than the struct, so loading goes through
/// the same parsing and validation as the on-disk stores. Clones share state.
#[derive(Default, Clone)]
pub struct InMemorySnapshotStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    saves: Arc<AtomicUsize>,
}

impl InMemorySnapshotStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts raw bytes under the snapshot key, bypassing serialization.
    pub async fn put_raw(&self, bytes: impl Into<Vec<u8>>) {
        let mut entries = self.entries.write().await;
        entries.insert(STORAGE_KEY.to_string(), bytes.into());
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<PtoSnapshot>> {
        let entries = self.entries.read().await;
        entries
            .get(STORAGE_KEY)
            .map(|bytes| PtoSnapshot::from_json(bytes))
            .transpose()
    }

    async fn save(&self, snapshot: &PtoSnapshot) -> Result<()> {
        let bytes = snapshot.to_json()?;
        let mut entries = self.entries.write().await;
        entries.insert(STORAGE_KEY.to_string(), bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
