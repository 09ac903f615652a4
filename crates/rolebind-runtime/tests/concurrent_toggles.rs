//! Concurrency tests for the binding service.
//!
//! Many threads toggling the same (principal, resource, role) must never
//! see `AlreadyExists`/`NotFound`, and the final state must equal the
//! parity of the number of toggles.

use rolebind_auth::{RelationshipStore, Role, RoleState};
use rolebind_runtime::{MemoryDirectory, MemoryRelationshipStore, RoleBindingService};
use rolebind_types::{GroupRef, Principal, ProjectRef, Resource, UserRef};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;

fn service() -> Arc<RoleBindingService> {
    Arc::new(RoleBindingService::new(
        Arc::new(MemoryRelationshipStore::new()),
        Arc::new(MemoryDirectory::new()),
    ))
}

/// Runs `per_thread` toggles on each of `THREADS` threads, all released
/// by one barrier, and returns every observed result.
fn hammer(
    service: &Arc<RoleBindingService>,
    principal: &Principal,
    resource: &Resource,
    role: Role,
    per_thread: usize,
) -> Vec<RoleState> {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let service = Arc::clone(service);
            let barrier = Arc::clone(&barrier);
            let principal = principal.clone();
            let resource = resource.clone();
            thread::spawn(move || {
                barrier.wait();
                (0..per_thread)
                    .map(|_| {
                        service
                            .toggle_role(&principal, &resource, role)
                            .expect("toggle must not fail under contention")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    handles
        .into_iter()
        .flat_map(|h| h.join().expect("thread panicked"))
        .collect()
}

#[test]
fn even_number_of_toggles_restores_state() {
    let service = service();
    let user = Principal::User(UserRef::named("tom"));
    let project = Resource::Project(ProjectRef::named("home:tom"));

    let results = hammer(&service, &user, &project, Role::Reviewer, 50);

    assert_eq!(results.len(), THREADS * 50);
    assert!(!service.store().exists(&user, &project, Role::Reviewer));
    assert_eq!(service.store().binding_count(), 0);
}

#[test]
fn odd_number_of_toggles_leaves_role_bound() {
    let service = service();
    let group = Principal::Group(GroupRef::named("existing_group"));
    let project = Resource::Project(ProjectRef::named("home:tom"));
    service
        .store()
        .create(&group, &project, Role::Maintainer)
        .unwrap();

    // 8 threads × 50 + 1 extra = odd
    hammer(&service, &group, &project, Role::Bugowner, 50);
    service.toggle_role(&group, &project, Role::Bugowner).unwrap();

    assert!(service.store().exists(&group, &project, Role::Bugowner));
    assert!(service.store().exists(&group, &project, Role::Maintainer));
    assert_eq!(service.store().binding_count(), 2);
}

#[test]
fn results_alternate_in_serial_order() {
    let service = service();
    let user = Principal::User(UserRef::named("tom"));
    let project = Resource::Project(ProjectRef::named("home:tom"));

    let results = hammer(&service, &user, &project, Role::Reader, 25);

    // Serialized toggles flip the state each time, so across all threads
    // exactly half the results are Bound.
    let bound = results.iter().filter(|s| s.is_bound()).count();
    assert_eq!(bound * 2, results.len());
}

#[test]
fn disjoint_pairs_are_all_applied() {
    let service = service();
    let project = Resource::Project(ProjectRef::named("home:tom"));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            let project = project.clone();
            thread::spawn(move || {
                let user = Principal::User(UserRef::named(format!("user{i}")));
                barrier.wait();
                for role in [Role::Maintainer, Role::Reviewer, Role::Reader] {
                    service.toggle_role(&user, &project, role).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("thread panicked");
    }

    assert_eq!(service.store().binding_count(), THREADS * 3);
    assert_eq!(
        service
            .list_rows(&project, rolebind_types::PrincipalKind::User)
            .len(),
        THREADS
    );
}

#[test]
fn toggles_racing_removal_leave_consistent_state() {
    let service = service();
    let user = Principal::User(UserRef::named("tom"));
    let project = Resource::Project(ProjectRef::named("home:tom"));
    let barrier = Arc::new(Barrier::new(2));

    let toggler = {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        let user = user.clone();
        let project = project.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                service.toggle_role(&user, &project, Role::Bugowner).unwrap();
            }
        })
    };
    let remover = {
        let service = Arc::clone(&service);
        let barrier = Arc::clone(&barrier);
        let user = user.clone();
        let project = project.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                service.remove_principal(&user, &project);
            }
        })
    };
    toggler.join().expect("thread panicked");
    remover.join().expect("thread panicked");

    // Whatever the interleaving, listing and exists agree.
    let bound = service.store().exists(&user, &project, Role::Bugowner);
    let rows = service.list_rows(&project, rolebind_types::PrincipalKind::User);
    assert_eq!(rows.len(), usize::from(bound));
}
