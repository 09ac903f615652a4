//! Default implementation of [`Directory`].
//!
//! [`MemoryDirectory`] keeps logins and group titles in memory. It can be
//! populated programmatically or from a JSON directory file:
//!
//! ```json
//! {
//!   "users": ["user_tab_user", "other_user", { "id": "…uuid…", "name": "tom" }],
//!   "groups": ["existing_group", "other_group"]
//! }
//! ```
//!
//! A bare string gets an id derived from the name; an object pins the id.
//! Matching is exact and case-sensitive.

use crate::store::{expand_tilde, StorageError};
use parking_lot::RwLock;
use rolebind_auth::{Directory, LookupError};
use rolebind_types::{GroupId, GroupRef, PrincipalKind, UserId, UserRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// One entry of a directory file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectoryEntry {
    /// Name only; the id is derived from it.
    Name(String),
    /// Name with a pinned id.
    Pinned { id: Uuid, name: String },
}

impl DirectoryEntry {
    fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Pinned { name, .. } => name,
        }
    }
}

/// On-disk layout of a directory file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryFile {
    pub users: Vec<DirectoryEntry>,
    pub groups: Vec<DirectoryEntry>,
}

/// Thread-safe in-memory directory.
///
/// # Example
///
/// ```
/// use rolebind_auth::Directory;
/// use rolebind_runtime::MemoryDirectory;
///
/// let dir = MemoryDirectory::new();
/// dir.add_user("other_user");
///
/// assert!(dir.resolve_user("other_user").is_ok());
/// assert!(dir.resolve_user("Jimmy").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RwLock<HashMap<String, UserRef>>,
    groups: RwLock<HashMap<String, GroupRef>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user, replacing any previous entry with the same login.
    pub fn register_user(&self, user: UserRef) {
        self.users.write().insert(user.login.clone(), user);
    }

    /// Registers a group, replacing any previous entry with the same title.
    pub fn register_group(&self, group: GroupRef) {
        self.groups.write().insert(group.title.clone(), group);
    }

    /// Registers a user whose id is derived from the login.
    pub fn add_user(&self, login: impl Into<String>) -> UserRef {
        let user = UserRef::named(login);
        self.register_user(user.clone());
        user
    }

    /// Registers a group whose id is derived from the title.
    pub fn add_group(&self, title: impl Into<String>) -> GroupRef {
        let group = GroupRef::named(title);
        self.register_group(group.clone());
        group
    }

    /// Number of registered users and groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len() + self.groups.read().len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a directory from parsed file contents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateEntry`] if a login or title is
    /// listed twice.
    pub fn from_entries(file: &DirectoryFile) -> Result<Self, StorageError> {
        let dir = Self::new();

        for entry in &file.users {
            if dir.users.read().contains_key(entry.name()) {
                return Err(StorageError::DuplicateEntry(format!("user {}", entry.name())));
            }
            dir.register_user(match entry {
                DirectoryEntry::Name(name) => UserRef::named(name.as_str()),
                DirectoryEntry::Pinned { id, name } => UserRef::new(UserId(*id), name.as_str()),
            });
        }

        for entry in &file.groups {
            if dir.groups.read().contains_key(entry.name()) {
                return Err(StorageError::DuplicateEntry(format!("group {}", entry.name())));
            }
            dir.register_group(match entry {
                DirectoryEntry::Name(name) => GroupRef::named(name.as_str()),
                DirectoryEntry::Pinned { id, name } => GroupRef::new(GroupId(*id), name.as_str()),
            });
        }

        Ok(dir)
    }

    /// Loads a directory file; a missing file yields an empty directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// parsed, or lists a name twice.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = expand_tilde(path.as_ref());
        if !path.exists() {
            debug!(path = %path.display(), "No directory file, starting empty");
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(&path).map_err(|e| StorageError::io(&path, e))?;
        let file: DirectoryFile = serde_json::from_str(&json)?;
        let dir = Self::from_entries(&file)?;
        debug!(path = %path.display(), entries = dir.len(), "Loaded directory file");
        Ok(dir)
    }
}

impl Directory for MemoryDirectory {
    fn resolve_user(&self, login: &str) -> Result<UserRef, LookupError> {
        self.users
            .read()
            .get(login)
            .cloned()
            .ok_or_else(|| LookupError::not_found(PrincipalKind::User, login))
    }

    fn resolve_group(&self, title: &str) -> Result<GroupRef, LookupError> {
        self.groups
            .read()
            .get(title)
            .cloned()
            .ok_or_else(|| LookupError::not_found(PrincipalKind::Group, title))
    }
}
