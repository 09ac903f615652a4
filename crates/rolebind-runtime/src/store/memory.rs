//! Default implementation of [`RelationshipStore`].
//!
//! Provides [`MemoryRelationshipStore`], a thread-safe in-memory store
//! sharded per resource.
//!
//! # Layout
//!
//! ```text
//! shards: RwLock<HashMap<Resource, Arc<Mutex<Shard>>>>
//!                              │
//!                              └── Shard = HashMap<Principal, BTreeSet<Role>>
//! ```
//!
//! The outer `RwLock` is only write-locked the first time a resource is
//! seen. Every read or write of bindings takes the owning resource's
//! `Mutex`, so operations on different resources never contend, and
//! check-and-insert in [`create`](RelationshipStore::create) happens
//! under a single guard.
//!
//! Shards are never removed from the table. Dropping a shard while
//! another thread still holds its `Arc` would lose that thread's write.

use parking_lot::{Mutex, RwLock};
use rolebind_auth::{
    Binding, PrincipalRoles, RelationshipStore, ResourceRoles, Role, StoreError,
};
use rolebind_types::{Principal, PrincipalKind, Resource};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

type Shard = HashMap<Principal, BTreeSet<Role>>;

/// Thread-safe, in-memory relationship store.
///
/// # Example
///
/// ```
/// use rolebind_auth::{RelationshipStore, Role};
/// use rolebind_runtime::MemoryRelationshipStore;
/// use rolebind_types::{Principal, ProjectRef, Resource, UserRef};
///
/// let store = MemoryRelationshipStore::new();
/// let tom = Principal::User(UserRef::named("tom"));
/// let home = Resource::Project(ProjectRef::named("home:tom"));
///
/// store.create(&tom, &home, Role::Maintainer).unwrap();
/// assert!(store.exists(&tom, &home, Role::Maintainer));
/// assert!(store.create(&tom, &home, Role::Maintainer).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryRelationshipStore {
    shards: RwLock<HashMap<Resource, Arc<Mutex<Shard>>>>,
}

impl MemoryRelationshipStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding exactly `bindings`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] for the first triple that
    /// appears twice. No store is returned in that case.
    pub fn from_bindings(bindings: &[Binding]) -> Result<Self, StoreError> {
        let store = Self::new();
        for binding in bindings {
            store.create(&binding.principal, &binding.resource, binding.role)?;
        }
        Ok(store)
    }

    /// Adds bindings from a previously saved list.
    ///
    /// Triples already present are skipped (additive merge). Returns the
    /// number of bindings actually added.
    pub fn restore_bindings(&self, bindings: &[Binding]) -> usize {
        bindings
            .iter()
            .filter(|b| self.create(&b.principal, &b.resource, b.role).is_ok())
            .count()
    }

    fn shard(&self, resource: &Resource) -> Option<Arc<Mutex<Shard>>> {
        self.shards.read().get(resource).cloned()
    }

    fn shard_or_insert(&self, resource: &Resource) -> Arc<Mutex<Shard>> {
        if let Some(shard) = self.shard(resource) {
            return shard;
        }
        let mut shards = self.shards.write();
        Arc::clone(shards.entry(resource.clone()).or_default())
    }

    fn all_shards(&self) -> Vec<(Resource, Arc<Mutex<Shard>>)> {
        self.shards
            .read()
            .iter()
            .map(|(resource, shard)| (resource.clone(), Arc::clone(shard)))
            .collect()
    }
}

impl RelationshipStore for MemoryRelationshipStore {
    fn create(
        &self,
        principal: &Principal,
        resource: &Resource,
        role: Role,
    ) -> Result<Binding, StoreError> {
        let shard = self.shard_or_insert(resource);
        let mut guard = shard.lock();

        // or_default() only inserts an empty set when the principal is
        // absent, in which case insert() below cannot fail.
        if !guard.entry(principal.clone()).or_default().insert(role) {
            return Err(StoreError::AlreadyExists {
                principal: principal.clone(),
                resource: resource.clone(),
                role,
            });
        }

        debug!(%principal, %resource, %role, "binding created");
        Ok(Binding::new(principal.clone(), resource.clone(), role))
    }

    fn exists(&self, principal: &Principal, resource: &Resource, role: Role) -> bool {
        self.shard(resource).is_some_and(|shard| {
            let guard = shard.lock();
            guard
                .get(principal)
                .is_some_and(|roles| roles.contains(&role))
        })
    }

    fn roles_of(&self, principal: &Principal, resource: &Resource) -> BTreeSet<Role> {
        self.shard(resource)
            .and_then(|shard| {
                let guard = shard.lock();
                guard.get(principal).cloned()
            })
            .unwrap_or_default()
    }

    fn list_principals(&self, resource: &Resource, kind: PrincipalKind) -> Vec<PrincipalRoles> {
        let Some(shard) = self.shard(resource) else {
            return Vec::new();
        };

        let mut rows: Vec<PrincipalRoles> = shard
            .lock()
            .iter()
            .filter(|(principal, roles)| principal.kind() == kind && !roles.is_empty())
            .map(|(principal, roles)| (principal.clone(), roles.clone()))
            .collect();

        rows.sort_by(|(a, _), (b, _)| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.uuid().cmp(&b.uuid()))
        });
        rows
    }

    fn delete(
        &self,
        principal: &Principal,
        resource: &Resource,
        role: Role,
    ) -> Result<(), StoreError> {
        let not_found = || StoreError::NotFound {
            principal: principal.clone(),
            resource: resource.clone(),
            role,
        };

        let shard = self.shard(resource).ok_or_else(not_found)?;
        let mut guard = shard.lock();
        let roles = guard.get_mut(principal).ok_or_else(not_found)?;

        if !roles.remove(&role) {
            return Err(not_found());
        }
        if roles.is_empty() {
            guard.remove(principal);
        }

        debug!(%principal, %resource, %role, "binding deleted");
        Ok(())
    }

    fn delete_all(&self, principal: &Principal, resource: &Resource) -> usize {
        let removed = self
            .shard(resource)
            .and_then(|shard| {
                let mut guard = shard.lock();
                guard.remove(principal)
            })
            .map_or(0, |roles| roles.len());

        if removed > 0 {
            debug!(%principal, %resource, removed, "bindings deleted");
        }
        removed
    }

    fn resources_of(&self, principal: &Principal) -> Vec<ResourceRoles> {
        let mut rows: Vec<ResourceRoles> = self
            .all_shards()
            .into_iter()
            .filter_map(|(resource, shard)| {
                let roles = shard.lock().get(principal).cloned()?;
                (!roles.is_empty()).then_some((resource, roles))
            })
            .collect();

        rows.sort_by(|(a, _), (b, _)| {
            a.name()
                .cmp(&b.name())
                .then_with(|| a.uuid().cmp(&b.uuid()))
        });
        rows
    }

    fn binding_count(&self) -> usize {
        self.all_shards()
            .iter()
            .map(|(_, shard)| shard.lock().values().map(BTreeSet::len).sum::<usize>())
            .sum()
    }

    fn list_bindings(&self) -> Vec<Binding> {
        let mut bindings = Vec::new();
        for (resource, shard) in self.all_shards() {
            let guard = shard.lock();
            for (principal, roles) in guard.iter() {
                bindings.extend(
                    roles
                        .iter()
                        .map(|role| Binding::new(principal.clone(), resource.clone(), *role)),
                );
            }
        }
        bindings
    }
}
