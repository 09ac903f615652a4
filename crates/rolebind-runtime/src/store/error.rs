//! Storage error types.

use rolebind_auth::StoreError;
use rolebind_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing state files (snapshots, directory files).
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot written by an incompatible version.
    #[error("version incompatible: file version {file_version}, supported {supported_version}")]
    VersionIncompatible {
        file_version: u32,
        supported_version: u32,
    },

    /// Snapshot contains the same binding twice.
    #[error("corrupt snapshot: {0}")]
    Duplicate(#[source] StoreError),

    /// Directory file lists the same login or title twice.
    #[error("duplicate directory entry: {0}")]
    DuplicateEntry(String),

    /// Taking the cross-process file lock failed.
    #[error("failed to lock '{path}': {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parent directory creation failed.
    #[error("failed to create storage directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Creates an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a Lock error.
    pub fn lock(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Lock {
            path: path.into(),
            source,
        }
    }

    /// Creates a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}

impl ErrorCode for StorageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "SNAPSHOT_IO",
            Self::Serialization(_) => "SNAPSHOT_SERIALIZATION",
            Self::VersionIncompatible { .. } => "SNAPSHOT_VERSION_INCOMPATIBLE",
            Self::Duplicate(_) => "SNAPSHOT_DUPLICATE",
            Self::DuplicateEntry(_) => "SNAPSHOT_DUPLICATE_ENTRY",
            Self::Lock { .. } => "SNAPSHOT_LOCK",
            Self::DirectoryCreation { .. } => "SNAPSHOT_DIRECTORY_CREATION",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
