//! Property tests for the store and service.
//!
//! Random sequences of operations over a small universe of principals,
//! resources and roles, checked against a `BTreeSet` model.

use proptest::prelude::*;
use rolebind_auth::{RelationshipStore, Role, RoleCatalog, RoleState};
use rolebind_runtime::{MemoryDirectory, MemoryRelationshipStore, RoleBindingService};
use rolebind_types::{
    GroupRef, PackageRef, Principal, PrincipalKind, ProjectRef, Resource, UserRef,
};
use std::collections::BTreeSet;
use std::sync::Arc;

fn principals() -> Vec<Principal> {
    vec![
        Principal::User(UserRef::named("tom")),
        Principal::User(UserRef::named("other_user")),
        Principal::Group(GroupRef::named("existing_group")),
    ]
}

fn resources() -> Vec<Resource> {
    let home = ProjectRef::named("home:tom");
    vec![
        Resource::Project(home.clone()),
        Resource::Package(PackageRef::named(home, "ctris")),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Toggle(usize, usize, usize),
    Remove(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..3usize, 0..2usize, 0..5usize).prop_map(|(p, x, r)| Op::Toggle(p, x, r)),
        1 => (0..3usize, 0..2usize).prop_map(|(p, x)| Op::Remove(p, x)),
    ]
}

fn service() -> RoleBindingService {
    RoleBindingService::new(
        Arc::new(MemoryRelationshipStore::new()),
        Arc::new(MemoryDirectory::new()),
    )
}

proptest! {
    /// The service agrees with a set model after any operation sequence.
    #[test]
    fn service_matches_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let service = service();
        let ps = principals();
        let xs = resources();
        let roles = RoleCatalog::all_roles();
        let mut model: BTreeSet<(usize, usize, Role)> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Toggle(p, x, r) => {
                    let role = roles[r];
                    let state = service.toggle_role(&ps[p], &xs[x], role).unwrap();
                    let now_bound = if model.remove(&(p, x, role)) {
                        false
                    } else {
                        model.insert((p, x, role));
                        true
                    };
                    prop_assert_eq!(state, RoleState::from(now_bound));
                }
                Op::Remove(p, x) => {
                    let expected = model.iter().filter(|(mp, mx, _)| *mp == p && *mx == x).count();
                    model.retain(|(mp, mx, _)| !(*mp == p && *mx == x));
                    prop_assert_eq!(service.remove_principal(&ps[p], &xs[x]), expected);
                }
            }
        }

        prop_assert_eq!(service.store().binding_count(), model.len());
        for (p, principal) in ps.iter().enumerate() {
            for (x, resource) in xs.iter().enumerate() {
                let expected: BTreeSet<Role> = model
                    .iter()
                    .filter(|(mp, mx, _)| *mp == p && *mx == x)
                    .map(|(_, _, r)| *r)
                    .collect();
                prop_assert_eq!(service.roles_of(principal, resource), expected);
            }
        }
    }

    /// Toggling the same role twice is a no-op on the role set.
    #[test]
    fn toggle_is_involution(
        seed in prop::collection::vec((0..3usize, 0..2usize, 0..5usize), 0..16),
        p in 0..3usize,
        x in 0..2usize,
        r in 0..5usize,
    ) {
        let service = service();
        let ps = principals();
        let xs = resources();
        let roles = RoleCatalog::all_roles();
        for (sp, sx, sr) in seed {
            service.toggle_role(&ps[sp], &xs[sx], roles[sr]).unwrap();
        }

        let before = service.roles_of(&ps[p], &xs[x]);
        let first = service.toggle_role(&ps[p], &xs[x], roles[r]).unwrap();
        let second = service.toggle_role(&ps[p], &xs[x], roles[r]).unwrap();

        prop_assert_eq!(second, first.flipped());
        prop_assert_eq!(service.roles_of(&ps[p], &xs[x]), before);
    }

    /// A created triple exists and cannot be created again.
    #[test]
    fn create_is_unique(p in 0..3usize, x in 0..2usize, r in 0..5usize) {
        let store = MemoryRelationshipStore::new();
        let ps = principals();
        let xs = resources();
        let role = RoleCatalog::all_roles()[r];

        prop_assert!(store.create(&ps[p], &xs[x], role).is_ok());
        prop_assert!(store.exists(&ps[p], &xs[x], role));
        prop_assert!(store.create(&ps[p], &xs[x], role).is_err());
        prop_assert_eq!(store.binding_count(), 1);
    }

    /// A row shows role R checked iff the triple exists.
    #[test]
    fn rows_reflect_exists(ops in prop::collection::vec(op_strategy(), 0..48)) {
        let service = service();
        let ps = principals();
        let xs = resources();
        let roles = RoleCatalog::all_roles();
        for op in ops {
            match op {
                Op::Toggle(p, x, r) => {
                    service.toggle_role(&ps[p], &xs[x], roles[r]).unwrap();
                }
                Op::Remove(p, x) => {
                    service.remove_principal(&ps[p], &xs[x]);
                }
            }
        }

        for resource in &xs {
            for kind in PrincipalKind::ALL {
                let rows = service.list_rows(resource, kind);
                for row in &rows {
                    prop_assert!(!service.roles_of(&row.principal, resource).is_empty());
                    for role in roles {
                        prop_assert_eq!(
                            row.is_checked(*role),
                            service.store().exists(&row.principal, resource, *role)
                        );
                    }
                }
                let bound = ps
                    .iter()
                    .filter(|p| p.kind() == kind)
                    .filter(|p| !service.roles_of(p, resource).is_empty())
                    .count();
                prop_assert_eq!(rows.len(), bound);
            }
        }
    }
}
