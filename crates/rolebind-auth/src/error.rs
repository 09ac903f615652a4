//! Relationship store errors.
//!
//! ```text
//! create(P, X, R) ──► AlreadyExists   (triple present, nothing changed)
//! delete(P, X, R) ──► NotFound        (triple absent, nothing changed)
//! ```
//!
//! `AlreadyExists` is an ordinary outcome callers surface to users.
//! `NotFound` is only reachable by calling `delete` directly; the
//! service never deletes a binding it has not just observed under the
//! pair lock, so seeing it there means an invariant broke.

use crate::Role;
use rolebind_types::{ErrorCode, Principal, Resource};
use thiserror::Error;

/// Error from a [`RelationshipStore`](crate::RelationshipStore) operation.
///
/// # Example
///
/// ```
/// use rolebind_auth::{Role, StoreError};
/// use rolebind_types::{ErrorCode, Principal, ProjectRef, Resource, UserRef};
///
/// let err = StoreError::AlreadyExists {
///     principal: Principal::User(UserRef::named("tom")),
///     resource: Resource::Project(ProjectRef::named("home:tom")),
///     role: Role::Maintainer,
/// };
///
/// assert_eq!(err.code(), "STORE_ALREADY_EXISTS");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The (principal, resource, role) triple is already bound.
    #[error("relationship already exists: {principal} is {role} of {resource}")]
    AlreadyExists {
        principal: Principal,
        resource: Resource,
        role: Role,
    },

    /// The (principal, resource, role) triple is not bound.
    #[error("relationship not found: {principal} is not {role} of {resource}")]
    NotFound {
        principal: Principal,
        resource: Resource,
        role: Role,
    },
}

impl StoreError {
    /// Returns the role named by the failed operation.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::AlreadyExists { role, .. } | Self::NotFound { role, .. } => *role,
        }
    }
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyExists { .. } => "STORE_ALREADY_EXISTS",
            Self::NotFound { .. } => "STORE_NOT_FOUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
