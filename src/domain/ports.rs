use super::snapshot::PtoSnapshot;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Where calculator state lives between runs.
///
/// `load` returns `Ok(None)` when nothing has been saved yet; a payload that
/// exists but cannot be read is an error.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Option<PtoSnapshot>>;
    async fn save(&self, snapshot: &PtoSnapshot) -> Result<()>;
}

pub type SnapshotStoreBox = Arc<dyn SnapshotStore>;
