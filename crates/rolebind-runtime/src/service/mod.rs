//! Role binding service.
//!
//! [`RoleBindingService`] composes a [`Directory`] and a
//! [`RelationshipStore`] into the operations callers use:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`add_principal`](RoleBindingService::add_principal) | resolve, then bind the default role |
//! | [`toggle_role`](RoleBindingService::toggle_role) | delete if bound, create otherwise |
//! | [`remove_principal`](RoleBindingService::remove_principal) | drop every role of the pair |
//! | [`list_rows`](RoleBindingService::list_rows) | one [`RowView`] per principal |
//!
//! # Serialization
//!
//! Every mutating operation holds the lock of its (principal, resource)
//! pair from [`KeyLocks`] for its whole read-modify-write. Two pairs
//! never share a lock, so work on unrelated rows proceeds in parallel.
//!
//! ```text
//! toggle_role(P, X, R)
//!   locks.lock((P, X))        ← serialization point
//!   store.exists(P, X, R)?
//!     yes → store.delete      (NotFound here = Inconsistent)
//!     no  → store.create      (AlreadyExists here = Inconsistent)
//!   guard dropped
//! ```

mod error;
mod locks;
mod notice;
mod row;

pub use error::ServiceError;
pub use locks::{KeyGuard, KeyLocks};
pub use notice::Notice;
pub use row::RowView;

use rolebind_auth::{
    Directory, RelationshipStore, ResourceRoles, Role, RoleCatalog, RoleState, StoreError,
};
use rolebind_types::{Principal, PrincipalKind, Resource};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{error, info, warn};

type PairKey = (Principal, Resource);

/// Binding operations over a shared store.
///
/// Cheap to share: wrap in an `Arc` and call from any thread.
///
/// # Example
///
/// ```
/// use rolebind_auth::{Role, RoleState};
/// use rolebind_runtime::{MemoryDirectory, MemoryRelationshipStore, RoleBindingService};
/// use rolebind_types::{PrincipalKind, ProjectRef, Resource};
/// use std::sync::Arc;
///
/// let directory = MemoryDirectory::new();
/// directory.add_user("other_user");
/// let service = RoleBindingService::new(
///     Arc::new(MemoryRelationshipStore::new()),
///     Arc::new(directory),
/// );
/// let home = Resource::Project(ProjectRef::named("home:tom"));
///
/// let user = service.add_principal(PrincipalKind::User, "other_user", &home).unwrap();
/// assert_eq!(
///     service.toggle_role(&user, &home, Role::Reviewer).unwrap(),
///     RoleState::Bound
/// );
/// assert_eq!(service.list_rows(&home, PrincipalKind::User).len(), 1);
/// ```
#[derive(Debug)]
pub struct RoleBindingService {
    store: Arc<dyn RelationshipStore>,
    directory: Arc<dyn Directory>,
    locks: KeyLocks<PairKey>,
    prune_locks: bool,
}

impl RoleBindingService {
    /// Creates a service over `store`, resolving names through `directory`.
    #[must_use]
    pub fn new(store: Arc<dyn RelationshipStore>, directory: Arc<dyn Directory>) -> Self {
        Self {
            store,
            directory,
            locks: KeyLocks::new(),
            prune_locks: true,
        }
    }

    /// Whether pair locks are dropped once a pair has no roles left.
    ///
    /// Enabled by default. Disabling keeps one entry per pair ever
    /// touched, trading memory for fewer table writes.
    #[must_use]
    pub fn with_prune_locks(mut self, prune: bool) -> Self {
        self.prune_locks = prune;
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RelationshipStore> {
        &self.store
    }

    /// The directory used by [`add_principal`](Self::add_principal).
    #[must_use]
    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    /// Number of pair locks currently tracked.
    #[must_use]
    pub fn tracked_locks(&self) -> usize {
        self.locks.len()
    }

    /// Resolves a login or group title through the directory.
    ///
    /// # Errors
    ///
    /// [`ServiceError::LookupFailed`] carrying `reference` unchanged.
    pub fn resolve(&self, kind: PrincipalKind, reference: &str) -> Result<Principal, ServiceError> {
        self.directory.resolve(kind, reference).map_err(|_| {
            warn!(%kind, reference, "principal lookup failed");
            ServiceError::LookupFailed {
                kind,
                reference: reference.to_string(),
            }
        })
    }

    /// Resolves `reference` and binds the default role on `resource`.
    ///
    /// Existing roles of the principal are left untouched either way.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::LookupFailed`] if the directory has no match.
    ///   Nothing is written.
    /// - [`ServiceError::AlreadyExists`] if the default role is already
    ///   bound.
    pub fn add_principal(
        &self,
        kind: PrincipalKind,
        reference: &str,
        resource: &Resource,
    ) -> Result<Principal, ServiceError> {
        let principal = self.resolve(kind, reference)?;

        let role = RoleCatalog::default_role();
        let _guard = self.lock_pair(&principal, resource);
        match self.store.create(&principal, resource, role) {
            Ok(_) => {
                info!(%principal, %resource, %role, "principal added");
                Ok(principal)
            }
            Err(err) => {
                warn!(%principal, %resource, %role, "relationship already exists");
                Err(ServiceError::from_create(err))
            }
        }
    }

    /// Flips `role` for the pair and returns the state afterwards.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Inconsistent`] if the store contradicts the
    /// existence check taken under the pair lock. Not reachable when the
    /// store is only mutated through this service.
    pub fn toggle_role(
        &self,
        principal: &Principal,
        resource: &Resource,
        role: Role,
    ) -> Result<RoleState, ServiceError> {
        let guard = self.lock_pair(principal, resource);

        let state = if self.store.exists(principal, resource, role) {
            self.store
                .delete(principal, resource, role)
                .map_err(|e| self.inconsistent(e))?;
            RoleState::Unbound
        } else {
            self.store
                .create(principal, resource, role)
                .map_err(|e| self.inconsistent(e))?;
            RoleState::Bound
        };

        let emptied = !state.is_bound() && self.store.roles_of(principal, resource).is_empty();
        drop(guard);
        if emptied {
            self.release_pair(principal, resource);
        }

        info!(%principal, %resource, %role, ?state, "role toggled");
        Ok(state)
    }

    /// Removes every role of `principal` on `resource`.
    ///
    /// Idempotent. Returns how many bindings were removed, zero when the
    /// principal was not bound.
    pub fn remove_principal(&self, principal: &Principal, resource: &Resource) -> usize {
        let guard = self.lock_pair(principal, resource);
        let removed = self.store.delete_all(principal, resource);
        drop(guard);
        self.release_pair(principal, resource);

        info!(%principal, %resource, removed, "principal removed");
        removed
    }

    /// One row per principal of `kind` bound on `resource`, in display
    /// order. Every row lists every catalog role.
    #[must_use]
    pub fn list_rows(&self, resource: &Resource, kind: PrincipalKind) -> Vec<RowView> {
        self.store
            .list_principals(resource, kind)
            .into_iter()
            .map(|(principal, roles)| RowView::new(principal, &roles))
            .collect()
    }

    /// Checked state of every catalog role for the pair.
    #[must_use]
    pub fn display_state(&self, principal: &Principal, resource: &Resource) -> BTreeMap<Role, bool> {
        RoleCatalog::display_state(&self.store.roles_of(principal, resource))
    }

    /// Roles currently bound for the pair.
    #[must_use]
    pub fn roles_of(&self, principal: &Principal, resource: &Resource) -> BTreeSet<Role> {
        self.store.roles_of(principal, resource)
    }

    /// Every resource `principal` holds a role on.
    #[must_use]
    pub fn resources_of(&self, principal: &Principal) -> Vec<ResourceRoles> {
        self.store.resources_of(principal)
    }

    fn lock_pair(&self, principal: &Principal, resource: &Resource) -> KeyGuard {
        self.locks.lock(&(principal.clone(), resource.clone()))
    }

    fn release_pair(&self, principal: &Principal, resource: &Resource) {
        if self.prune_locks {
            self.locks.remove_idle(&(principal.clone(), resource.clone()));
        }
    }

    fn inconsistent(&self, err: StoreError) -> ServiceError {
        error!(error = %err, "store changed under a held pair lock");
        ServiceError::Inconsistent(err)
    }
}
