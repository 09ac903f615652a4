//! Directory lookup abstraction.
//!
//! The directory is the external authority on who exists. rolebind only
//! consumes it: a login resolves to a [`UserRef`], a group title to a
//! [`GroupRef`]. The resolved ref is then cached inside every binding.
//!
//! ```text
//! Directory trait (rolebind-auth)           ← THIS MODULE
//!          │
//!          └── MemoryDirectory (rolebind-runtime)   ← in-memory / JSON-file impl
//! ```

use rolebind_types::{ErrorCode, GroupRef, Principal, PrincipalKind, UserRef};
use thiserror::Error;

/// Lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No principal of `kind` matches `reference`.
    #[error("{kind} not found: {reference}")]
    NotFound {
        kind: PrincipalKind,
        reference: String,
    },
}

impl LookupError {
    pub fn not_found(kind: PrincipalKind, reference: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            reference: reference.into(),
        }
    }
}

impl ErrorCode for LookupError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "LOOKUP_NOT_FOUND",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// Resolves principal references to identities.
///
/// # Example
///
/// ```
/// use rolebind_auth::{Directory, LookupError};
/// use rolebind_types::{GroupRef, PrincipalKind, UserRef};
///
/// #[derive(Debug)]
/// struct OnlyTom;
///
/// impl Directory for OnlyTom {
///     fn resolve_user(&self, login: &str) -> Result<UserRef, LookupError> {
///         if login == "tom" {
///             Ok(UserRef::named("tom"))
///         } else {
///             Err(LookupError::not_found(PrincipalKind::User, login))
///         }
///     }
///
///     fn resolve_group(&self, title: &str) -> Result<GroupRef, LookupError> {
///         Err(LookupError::not_found(PrincipalKind::Group, title))
///     }
/// }
///
/// assert!(OnlyTom.resolve(PrincipalKind::User, "tom").is_ok());
/// assert!(OnlyTom.resolve(PrincipalKind::User, "Jimmy").is_err());
/// ```
pub trait Directory: Send + Sync + std::fmt::Debug {
    /// Resolves a login to a user.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if no user has this login.
    fn resolve_user(&self, login: &str) -> Result<UserRef, LookupError>;

    /// Resolves a group title to a group.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if no group has this title.
    fn resolve_group(&self, title: &str) -> Result<GroupRef, LookupError>;

    /// Resolves a reference of either kind.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] from the kind-specific lookup.
    fn resolve(&self, kind: PrincipalKind, reference: &str) -> Result<Principal, LookupError> {
        match kind {
            PrincipalKind::User => self.resolve_user(reference).map(Principal::User),
            PrincipalKind::Group => self.resolve_group(reference).map(Principal::Group),
        }
    }
}
