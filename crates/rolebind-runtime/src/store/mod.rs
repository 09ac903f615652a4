//! Relationship store implementation and persistence.
//!
//! - [`MemoryRelationshipStore`]: concrete [`RelationshipStore`](rolebind_auth::RelationshipStore)
//! - [`StoreSnapshot`] / [`SnapshotFile`]: JSON persistence between runs

mod error;
mod memory;
mod snapshot;

pub use error::StorageError;
pub use memory::MemoryRelationshipStore;
pub use snapshot::{SnapshotFile, SnapshotLock, StoreSnapshot, SNAPSHOT_VERSION};

pub(crate) use snapshot::expand_tilde;
