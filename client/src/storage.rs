//! # Durable Client-Side Storage
//!
//! [`Storage`] implementations holding the session token, the serialized
//! profile and UI preferences.
//!
//! - [`MemoryStorage`]: process-local map, for tests and ephemeral sessions
//! - [`FileStorage`]: JSON object persisted to a single file, rewritten on every change

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::{ClientError, Result, Storage};

/// In-memory storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// File-backed storage.
///
/// The whole map is written on each `set`/`remove`; the in-memory copy only
/// changes after the write succeeded, so memory never runs ahead of disk.
/// Writes go to a temporary file in the same directory that is then renamed
/// over the state file, so a crash mid-write leaves the previous contents.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file. A missing file is an empty store; a file that
    /// is not a JSON object of strings is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<BTreeMap<String, String>>(&content).map_err(|e| {
                ClientError::Storage(format!("{} is not a valid state file: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), keys = entries.len(), "Opened state file");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(content.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| {
            ClientError::Storage(format!("Failed to replace {}: {}", self.path.display(), e.error))
        })?;

        debug!(path = %self.path.display(), keys = entries.len(), "State file written");
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_file(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.write_file(&next)?;
        *entries = next;
        Ok(())
    }
}
