//! Local filesystem snapshot storage.
//!
//! Writes go to `<file>.tmp` first and are renamed over the target, so an
//! interrupted run leaves the previous snapshot intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::Item;
use crate::storage::{SnapshotData, SnapshotStore};

/// JSON file snapshot backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Ensure parent directory exists.
    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir()?;

        let tmp = self.tmp_path();
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

impl SnapshotStore for LocalStorage {
    fn load(&self) -> Result<Option<Vec<Item>>> {
        let Some(bytes) = self.read_bytes()? else {
            log::info!("No snapshot at {}", self.path.display());
            return Ok(None);
        };

        let data: SnapshotData = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::storage(&self.path, format!("corrupt snapshot: {e}")))?;
        if data.count != data.items.len() {
            log::warn!(
                "Snapshot header says {} items but {} were stored",
                data.count,
                data.items.len()
            );
        }
        log::debug!(
            "Loaded {} items saved at {}",
            data.items.len(),
            data.updated_at
        );
        Ok(Some(data.items))
    }

    fn save(&self, items: &[Item]) -> Result<()> {
        let data = SnapshotData::new(items.to_vec());
        let bytes = serde_json::to_vec_pretty(&data)
            .map_err(|e| AppError::storage(&self.path, format!("cannot encode snapshot: {e}")))?;
        self.write_bytes(&bytes)?;
        log::info!("Snapshot: {} items written to {}", data.count, self.path.display());
        Ok(())
    }
}
