//! rolebind runtime: implementation layer.
//!
//! Concrete implementations of the traits declared in `rolebind-auth`,
//! plus the binding service that callers drive.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Model Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  rolebind-types : ids, Principal, Resource, ErrorCode       │
//! │  rolebind-auth  : Role catalog, Binding, store/dir traits   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  store/     : MemoryRelationshipStore, snapshots            │
//! │  directory  : MemoryDirectory                               │
//! │  service/   : RoleBindingService, KeyLocks, Notice, RowView │
//! │  config/    : RolebindConfig, ConfigLoader                  │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (rolebind-cli)                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`service`] - Binding Operations
//!
//! - [`RoleBindingService`]: add / toggle / remove / list, serialized per
//!   (principal, resource) pair
//! - [`KeyLocks`]: the per-pair lock table
//! - [`Notice`]: the exact text shown to callers
//! - [`RowView`]: one principal's row with every catalog role
//!
//! ## [`store`] - Relationship Storage
//!
//! - [`MemoryRelationshipStore`]: in-memory store sharded per resource
//! - [`StoreSnapshot`] / [`SnapshotFile`]: JSON persistence between runs
//!
//! ## [`directory`] - Principal Lookup
//!
//! - [`MemoryDirectory`]: in-memory directory, optionally loaded from JSON
//!
//! ## [`config`] - Configuration Management
//!
//! - [`RolebindConfig`](config::RolebindConfig): unified configuration type
//! - [`ConfigLoader`](config::ConfigLoader): multi-source config loader
//!
//! Configuration priority: Environment > Project > Global > Default

pub mod config;
pub mod directory;
pub mod service;
pub mod store;

pub use config::{
    default_config_dir, default_config_path, ConfigError, ConfigLoader, ConfigResolver,
    LoggingConfig, NoOpResolver, PathsConfig, RolebindConfig, StoreConfig,
};
pub use directory::{DirectoryEntry, DirectoryFile, MemoryDirectory};
pub use service::{KeyGuard, KeyLocks, Notice, RoleBindingService, RowView, ServiceError};
pub use store::{
    MemoryRelationshipStore, SnapshotFile, SnapshotLock, StorageError, StoreSnapshot,
    SNAPSHOT_VERSION,
};
