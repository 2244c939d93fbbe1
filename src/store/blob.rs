use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".moodlog";
/// File name the entry blob is stored under. This is the single fixed key of
/// the persistence contract; any shape change to the entry format would need
/// a new key plus explicit migration, neither of which exists.
const BLOB_FILE_NAME: &str = "mood-entries.json";

/// Errors the persistence layer can produce. Callers above the entry store
/// never see these; the store logs and degrades to in-memory operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not locate home directory")]
    HomeMissing,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("entry encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value collaborator with exactly one key: the serialized entry
/// collection. `get` must tolerate absence (first run); interpreting the
/// payload, including corruption, is the entry store's job.
pub trait BlobStore {
    /// Read the stored blob, or `None` when nothing has been written yet.
    fn get(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored blob wholesale. No partial or incremental writes.
    fn set(&mut self, payload: &str) -> Result<(), StoreError>;
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dirs = BaseDirs::new().ok_or(StoreError::HomeMissing)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// File-backed blob store. The whole collection lives in one JSON file;
/// writes go to a temporary sibling first and are renamed into place so a
/// crash mid-write never leaves a truncated blob behind.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open a store at an explicit file path. Parent directories are created
    /// eagerly so the first save does not have to.
    pub fn new(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Open the store at its default location, `~/.moodlog/mood-entries.json`.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::new(data_dir()?.join(BLOB_FILE_NAME))
    }
}

impl BlobStore for FileStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn set(&mut self, payload: &str) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::trace!(path = ?self.path, bytes = payload.len(), "blob written");
        Ok(())
    }
}

/// In-memory double used by unit tests across the crate.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub data: Option<String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn seeded(payload: impl Into<String>) -> Self {
        Self {
            data: Some(payload.into()),
        }
    }
}

#[cfg(test)]
impl BlobStore for MemoryStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.data.clone())
    }

    fn set(&mut self, payload: &str) -> Result<(), StoreError> {
        self.data = Some(payload.to_string());
        Ok(())
    }
}

/// Test double whose writes always fail, standing in for a full disk or a
/// revoked quota.
#[cfg(test)]
#[derive(Default)]
pub struct FailingStore;

#[cfg(test)]
impl BlobStore for FailingStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&mut self, _payload: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other(
            "no space left on device",
        )))
    }
}
