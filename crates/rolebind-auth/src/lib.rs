//! Role-binding primitives for rolebind.
//!
//! This crate defines the vocabulary of the relationship engine and the
//! seams its implementations plug into. Concrete implementations live in
//! `rolebind-runtime`.
//!
//! # Model
//!
//! ```text
//! Binding = Principal(WHO) × Resource(WHERE) × Role(WHAT)
//! ```
//!
//! | Item | Type | Purpose |
//! |------|------|---------|
//! | [`Role`] / [`RoleCatalog`] | Enum + static catalog | The fixed, ordered set of roles |
//! | [`Binding`] | Struct | One grant; never mutated |
//! | [`RelationshipStore`] | Trait | Owns bindings, enforces uniqueness |
//! | [`Directory`] | Trait | Resolves logins / group titles |
//!
//! # Crate Architecture
//!
//! ```text
//! rolebind-types  (ids, Principal, Resource)
//!       ↑
//! rolebind-auth   ◄── THIS CRATE
//!       ↑
//! rolebind-runtime (MemoryRelationshipStore, MemoryDirectory, RoleBindingService)
//! ```
//!
//! # Design Principles
//!
//! - **Traits here, implementations in consumers**
//! - **No inheritance**: a package binding is independent of its project
//! - **Kind-agnostic**: one code path for users and groups, projects and packages

pub mod binding;
pub mod directory;
pub mod error;
pub mod role;
pub mod store;

pub use binding::{Binding, RoleState};
pub use directory::{Directory, LookupError};
pub use error::StoreError;
pub use role::{Role, RoleCatalog, UnknownRole};
pub use store::{PrincipalRoles, RelationshipStore, ResourceRoles};

// Re-export identity types for convenience
pub use rolebind_types::{Principal, PrincipalKind, Resource, ResourceKind};
