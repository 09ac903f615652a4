//! File-backed snapshots of the relationship store.
//!
//! The store itself is in-memory. Between process runs its bindings are
//! kept in a single pretty-printed JSON file:
//!
//! ```text
//! ~/.rolebind/state.json
//! {
//!   "version": 1,
//!   "bindings": [ { "principal": {...}, "resource": {...}, "role": "maintainer" }, ... ]
//! }
//! ```
//!
//! Writes go to a uniquely named temp file first and are renamed into
//! place. Processes sharing a state file serialize their
//! load-modify-save cycle through an exclusive lock on a sidecar file:
//!
//! ```text
//! state.json.lock   ← SnapshotFile::lock() holds this for the whole cycle
//! state.json        ← load(), then save() via .tmpXXXX + rename
//! ```

use super::{MemoryRelationshipStore, StorageError};
use fs2::FileExt;
use rolebind_auth::{Binding, RelationshipStore};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of every binding in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub bindings: Vec<Binding>,
}

impl StoreSnapshot {
    /// Captures the bindings of any store.
    ///
    /// Bindings are sorted (resource, principal kind, principal name,
    /// role) so that the same state always produces the same file.
    #[must_use]
    pub fn capture(store: &dyn RelationshipStore) -> Self {
        let mut bindings = store.list_bindings();
        bindings.sort_by(|a, b| {
            a.resource
                .name()
                .cmp(&b.resource.name())
                .then_with(|| a.resource.uuid().cmp(&b.resource.uuid()))
                .then_with(|| a.principal.kind().cmp(&b.principal.kind()))
                .then_with(|| a.principal.name().cmp(b.principal.name()))
                .then_with(|| a.principal.uuid().cmp(&b.principal.uuid()))
                .then_with(|| a.role.cmp(&b.role))
        });
        Self {
            version: SNAPSHOT_VERSION,
            bindings,
        }
    }

    /// Rebuilds a store from this snapshot.
    ///
    /// # Errors
    ///
    /// - [`StorageError::VersionIncompatible`] for unknown versions
    /// - [`StorageError::Duplicate`] if a triple appears twice
    pub fn into_store(self) -> Result<MemoryRelationshipStore, StorageError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StorageError::VersionIncompatible {
                file_version: self.version,
                supported_version: SNAPSHOT_VERSION,
            });
        }
        MemoryRelationshipStore::from_bindings(&self.bindings).map_err(StorageError::Duplicate)
    }

    /// Serializes to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            bindings: Vec::new(),
        }
    }
}

/// A snapshot file on disk.
///
/// # Example
///
/// ```no_run
/// use rolebind_runtime::{SnapshotFile, StoreSnapshot};
/// use std::path::PathBuf;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = SnapshotFile::new(PathBuf::from("~/.rolebind/state.json"));
/// let _lock = file.lock()?;
/// let store = file.load()?;
/// // ... mutate store ...
/// file.save(&StoreSnapshot::capture(&store))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a handle; `~/` is expanded, nothing is touched on disk.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_tilde(path.as_ref()),
        }
    }

    /// Returns the resolved file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        self.path.with_file_name(format!("{name}.lock"))
    }

    fn parent_dir(&self) -> Result<PathBuf, StorageError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !parent.exists() {
            std::fs::create_dir_all(&parent)
                .map_err(|e| StorageError::directory_creation(&parent, e))?;
        }
        Ok(parent)
    }

    /// Takes the exclusive cross-process lock for this file.
    ///
    /// Blocks until no other holder remains. Hold the returned guard
    /// from [`load`](Self::load) through [`save`](Self::save) so that
    /// concurrent processes never work from a stale store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the lock file cannot be opened or
    /// locked.
    pub fn lock(&self) -> Result<SnapshotLock, StorageError> {
        self.parent_dir()?;
        let path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| StorageError::io(&path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| StorageError::lock(&path, e))?;
        debug!(path = %path.display(), "Snapshot locked");
        Ok(SnapshotLock { file, path })
    }

    /// Loads the store; a missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// does not describe a valid store.
    pub fn load(&self) -> Result<MemoryRelationshipStore, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No snapshot file, starting empty");
            return Ok(MemoryRelationshipStore::new());
        }

        let json =
            std::fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let snapshot = StoreSnapshot::from_json(&json)?;
        debug!(
            path = %self.path.display(),
            bindings = snapshot.bindings.len(),
            "Loaded snapshot"
        );
        snapshot.into_store()
    }

    /// Writes the snapshot atomically (unique temp file, then rename).
    ///
    /// Creates the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory or file cannot be written.
    pub fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StorageError> {
        let parent = self.parent_dir()?;
        let json = snapshot.to_json()?;

        let mut temp =
            tempfile::NamedTempFile::new_in(&parent).map_err(|e| StorageError::io(&parent, e))?;
        temp.write_all(json.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| StorageError::io(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| StorageError::io(&self.path, e.error))?;

        debug!(
            path = %self.path.display(),
            bindings = snapshot.bindings.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}

/// Guard for [`SnapshotFile::lock`]; the lock is released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl SnapshotLock {
    /// Path of the sidecar lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        // Closing the file releases the lock anyway.
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %e, "Snapshot unlock failed");
        }
    }
}

/// Expands `~` to the user's home directory.
pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}
