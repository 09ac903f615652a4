//! Caller-facing notices.
//!
//! The rendering layer shows one line of text after each action. The
//! wording is a contract with existing callers and must stay exact:
//!
//! | Outcome | Text |
//! |---------|------|
//! | add succeeded | `Added user other_user with role maintainer` |
//! | duplicate | `Relationship already exists` |
//! | user lookup miss | `Couldn't find User with login = Jimmy` |
//! | group lookup miss | `Couldn't find Group 'unknown group'` |

use super::ServiceError;
use rolebind_auth::{Role, RoleCatalog};
use rolebind_types::PrincipalKind;

/// A message for the caller.
///
/// # Example
///
/// ```
/// use rolebind_runtime::{Notice, ServiceError};
/// use rolebind_types::PrincipalKind;
///
/// let err = ServiceError::LookupFailed {
///     kind: PrincipalKind::User,
///     reference: "Jimmy".to_string(),
/// };
/// assert_eq!(Notice::from(&err).to_string(), "Couldn't find User with login = Jimmy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A principal was added with a role.
    Added {
        kind: PrincipalKind,
        reference: String,
        role: Role,
    },
    /// The binding to create was already there.
    AlreadyExists,
    /// The principal reference did not resolve.
    NotFound {
        kind: PrincipalKind,
        reference: String,
    },
    /// Anything the caller cannot act on.
    Internal(String),
}

impl Notice {
    /// Success notice for an add, naming the default role.
    #[must_use]
    pub fn added(kind: PrincipalKind, reference: impl Into<String>) -> Self {
        Self::Added {
            kind,
            reference: reference.into(),
            role: RoleCatalog::default_role(),
        }
    }

    /// Returns `true` for notices that report a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Added { .. })
    }
}

impl From<&ServiceError> for Notice {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::LookupFailed { kind, reference } => Self::NotFound {
                kind: *kind,
                reference: reference.clone(),
            },
            ServiceError::AlreadyExists { .. } => Self::AlreadyExists,
            ServiceError::Inconsistent(inner) => Self::Internal(inner.to_string()),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added {
                kind,
                reference,
                role,
            } => write!(f, "Added {kind} {reference} with role {role}"),
            Self::AlreadyExists => f.write_str("Relationship already exists"),
            Self::NotFound {
                kind: PrincipalKind::User,
                reference,
            } => write!(
                f,
                "Couldn't find User with {} = {reference}",
                PrincipalKind::User.lookup_field()
            ),
            Self::NotFound {
                kind: PrincipalKind::Group,
                reference,
            } => write!(f, "Couldn't find Group '{reference}'"),
            Self::Internal(detail) => write!(f, "Internal error: {detail}"),
        }
    }
}
