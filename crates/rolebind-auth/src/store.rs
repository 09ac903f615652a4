//! Relationship store abstraction.
//!
//! # Architecture
//!
//! ```text
//! RelationshipStore trait (rolebind-auth)    ← THIS MODULE
//!          │
//!          └── MemoryRelationshipStore (rolebind-runtime)   ← sharded in-memory impl
//! ```
//!
//! # Atomicity
//!
//! `create` is a single check-and-insert step. An implementation must
//! never expose a window between "triple absent" and "triple inserted"
//! in which another `create` of the same triple can succeed.

use crate::{Binding, Role, StoreError};
use rolebind_types::{Principal, PrincipalKind, Resource};
use std::collections::BTreeSet;

/// One listed principal and the roles it holds on a resource.
pub type PrincipalRoles = (Principal, BTreeSet<Role>);

/// One resource and the roles a principal holds on it.
pub type ResourceRoles = (Resource, BTreeSet<Role>);

/// Owner of the set of (principal, resource, role) bindings.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; they are shared behind an
/// `Arc` by the binding service and called from many threads.
///
/// # Example
///
/// ```
/// use rolebind_auth::{RelationshipStore, Role};
/// use rolebind_types::{Principal, Resource};
///
/// fn is_maintainer(store: &dyn RelationshipStore, p: &Principal, x: &Resource) -> bool {
///     store.exists(p, x, Role::Maintainer)
/// }
/// ```
pub trait RelationshipStore: Send + Sync + std::fmt::Debug {
    /// Records a binding.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the triple is already
    /// bound. The store is unchanged in that case.
    fn create(
        &self,
        principal: &Principal,
        resource: &Resource,
        role: Role,
    ) -> Result<Binding, StoreError>;

    /// Returns `true` if the triple is bound.
    fn exists(&self, principal: &Principal, resource: &Resource, role: Role) -> bool;

    /// Returns every role the principal holds on the resource.
    ///
    /// Empty if the principal has no binding there.
    fn roles_of(&self, principal: &Principal, resource: &Resource) -> BTreeSet<Role>;

    /// Lists the principals of `kind` holding at least one role on the
    /// resource, one entry per principal.
    ///
    /// Ordered by display name, ties broken by id.
    fn list_principals(&self, resource: &Resource, kind: PrincipalKind) -> Vec<PrincipalRoles>;

    /// Removes a single binding.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the triple is not bound.
    fn delete(&self, principal: &Principal, resource: &Resource, role: Role)
        -> Result<(), StoreError>;

    /// Removes every binding of the principal on the resource in one step.
    ///
    /// Returns how many bindings were removed; zero is not an error.
    fn delete_all(&self, principal: &Principal, resource: &Resource) -> usize;

    /// Lists every resource the principal holds a role on.
    ///
    /// Ordered by resource display name, ties broken by id.
    fn resources_of(&self, principal: &Principal) -> Vec<ResourceRoles>;

    /// Total number of bindings in the store.
    fn binding_count(&self) -> usize;

    /// Returns every binding currently held.
    ///
    /// The order is unspecified. Used for persistence through
    /// `dyn RelationshipStore` without knowing the concrete type.
    fn list_bindings(&self) -> Vec<Binding>;
}
