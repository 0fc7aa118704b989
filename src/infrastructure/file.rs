use crate::domain::ports::SnapshotStore;
use crate::domain::snapshot::{PtoSnapshot, STORAGE_KEY};
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the snapshot as a JSON file inside a state directory.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the old one, so a crash never leaves a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<PtoSnapshot>> {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => PtoSnapshot::from_json(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, snapshot: &PtoSnapshot) -> Result<()> {
        let bytes = snapshot.to_json()?;
        let dir = self.dir.clone();
        let path = self.path();

        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &bytes))
            .await
            .map_err(|e| ToolError::IoError(io::Error::other(e)))??;

        tracing::debug!(path = %self.path().display(), "saved snapshot");
        Ok(())
    }
}

fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
