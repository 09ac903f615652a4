//! Binding service errors.

use super::Notice;
use rolebind_auth::{Role, StoreError};
use rolebind_types::{ErrorCode, Principal, PrincipalKind, Resource};
use thiserror::Error;

/// Error from a [`RoleBindingService`](super::RoleBindingService) operation.
///
/// | Variant | Cause | Recoverable |
/// |---------|-------|-------------|
/// | `LookupFailed` | Reference did not resolve in the directory | yes |
/// | `AlreadyExists` | Add hit an existing binding | yes |
/// | `Inconsistent` | Store disagreed with a read taken under the pair lock | no |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The principal reference did not resolve.
    #[error("{kind} lookup failed for '{reference}'")]
    LookupFailed {
        kind: PrincipalKind,
        /// The reference exactly as the caller supplied it.
        reference: String,
    },

    /// The binding to create already exists. Nothing changed.
    #[error("relationship already exists: {principal} is {role} of {resource}")]
    AlreadyExists {
        principal: Principal,
        resource: Resource,
        role: Role,
    },

    /// Internal invariant violation inside a serialized operation.
    #[error("relationship store inconsistent: {0}")]
    Inconsistent(#[source] StoreError),
}

impl ServiceError {
    /// The caller-facing message for this error.
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::from(self)
    }

    /// Maps a store error seen by a plain create.
    pub(crate) fn from_create(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists {
                principal,
                resource,
                role,
            } => Self::AlreadyExists {
                principal,
                resource,
                role,
            },
            other @ StoreError::NotFound { .. } => Self::Inconsistent(other),
        }
    }
}

impl ErrorCode for ServiceError {
    fn code(&self) -> &'static str {
        match self {
            Self::LookupFailed { .. } => "SERVICE_LOOKUP_FAILED",
            Self::AlreadyExists { .. } => "SERVICE_ALREADY_EXISTS",
            Self::Inconsistent(_) => "SERVICE_INCONSISTENT",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Inconsistent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolebind_types::{assert_error_codes, ProjectRef, UserRef};

    fn triple() -> (Principal, Resource, Role) {
        (
            Principal::User(UserRef::named("other_user")),
            Resource::Project(ProjectRef::named("home:tom")),
            Role::Maintainer,
        )
    }

    #[test]
    fn from_create_maps_already_exists() {
        let (principal, resource, role) = triple();
        let err = ServiceError::from_create(StoreError::AlreadyExists {
            principal: principal.clone(),
            resource: resource.clone(),
            role,
        });
        assert_eq!(
            err,
            ServiceError::AlreadyExists {
                principal,
                resource,
                role
            }
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn from_create_maps_not_found_to_inconsistent() {
        let (principal, resource, role) = triple();
        let err = ServiceError::from_create(StoreError::NotFound {
            principal,
            resource,
            role,
        });
        assert!(matches!(err, ServiceError::Inconsistent(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn codes_follow_convention() {
        let (principal, resource, role) = triple();
        assert_error_codes(
            &[
                ServiceError::LookupFailed {
                    kind: PrincipalKind::User,
                    reference: "Jimmy".to_string(),
                },
                ServiceError::AlreadyExists {
                    principal: principal.clone(),
                    resource: resource.clone(),
                    role,
                },
                ServiceError::Inconsistent(StoreError::NotFound {
                    principal,
                    resource,
                    role,
                }),
            ],
            "SERVICE_",
        );
    }
}
