//! Snapshot storage backends.

use crate::{TitheError, TitheResult};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Opaque storage for one serialized snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored snapshot, or `None` if nothing has been saved.
    fn load_raw(&self) -> TitheResult<Option<String>>;

    /// Replaces the stored snapshot.
    fn save(&self, json: &str) -> TitheResult<()>;

    /// Removes the stored snapshot. Clearing an empty store is not an error.
    fn clear(&self) -> TitheResult<()>;
}

/// Keeps the snapshot in a JSON file on disk.
///
/// Writes go to a sibling temp file that is then renamed over the real
/// one, so a crash mid-write leaves the previous save intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SnapshotStore for JsonFileStore {
    fn load_raw(&self) -> TitheResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, json: &str) -> TitheResult<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        debug!("Wrote {} bytes to {}", json.len(), self.path.display());
        Ok(())
    }

    fn clear(&self) -> TitheResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    contents: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `json`.
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(json.into())),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            contents: Mutex::new(None),
            fail_writes: true,
        }
    }

    /// Current contents, if any.
    pub fn contents(&self) -> Option<String> {
        self.lock().ok().and_then(|contents| contents.clone())
    }

    fn lock(&self) -> TitheResult<std::sync::MutexGuard<'_, Option<String>>> {
        self.contents
            .lock()
            .map_err(|_| TitheError::InvalidState("memory store lock poisoned".to_string()))
    }
}

impl SnapshotStore for MemoryStore {
    fn load_raw(&self) -> TitheResult<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, json: &str) -> TitheResult<()> {
        if self.fail_writes {
            return Err(TitheError::Io(std::io::Error::new(
                ErrorKind::PermissionDenied,
                "memory store is read-only",
            )));
        }
        *self.lock()? = Some(json.to_string());
        Ok(())
    }

    fn clear(&self) -> TitheResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}
