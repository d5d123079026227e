//! Atomic JSON file operations.
//!
//! Writes go to a temporary file in the same directory, are fsynced and then
//! renamed over the target, so readers never observe a half-written snapshot.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use pitchdesk_core::PitchdeskError;

#[derive(Debug, Error)]
pub enum AtomicJsonError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot lock unavailable: {0}")]
    Lock(std::io::Error),
}

impl From<AtomicJsonError> for PitchdeskError {
    fn from(e: AtomicJsonError) -> Self {
        match e {
            AtomicJsonError::Io(io) => io.into(),
            AtomicJsonError::Json(json) => json.into(),
            AtomicJsonError::Lock(io) => PitchdeskError::data_access(format!("snapshot lock: {io}")),
        }
    }
}

/// A handle to a JSON file that is replaced atomically on every save.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing or blank file yields `None`.
    pub fn load(&self) -> Result<Option<T>, AtomicJsonError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Replaces the snapshot with `data` while holding the sidecar lock.
    pub fn save(&self, data: &T) -> Result<(), AtomicJsonError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let _guard = SnapshotLock::acquire(self.path.with_extension("lock"))?;
        let staging = self.staging_path();

        let mut file = File::create(&staging)?;
        serde_json::to_writer_pretty(&mut file, data)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// `.store.json.tmp` next to `store.json`.
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

/// Exclusive lock on a sidecar file, removed again on drop.
struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl SnapshotLock {
    fn acquire(path: PathBuf) -> Result<Self, AtomicJsonError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive().map_err(AtomicJsonError::Lock)?;
        Ok(Self { file, path })
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Snapshot>::new(temp_dir.path().join("store.json"));

        let snapshot = Snapshot {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&snapshot).unwrap();

        assert_eq!(file.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<Snapshot>::new(temp_dir.path().join("missing.json"));

        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_no_leftovers_after_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");
        let file = AtomicJsonFile::<Snapshot>::new(path.clone());

        file.save(&Snapshot {
            name: "a".into(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join(".store.json.tmp").exists());
        assert!(!temp_dir.path().join("nested").join("store.lock").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let file = AtomicJsonFile::<Snapshot>::new(path);
        assert!(matches!(file.load(), Err(AtomicJsonError::Json(_))));
    }
}
