//! Role bindings.
//!
//! A [`Binding`] is the atomic unit of grant: one principal holding one
//! role on one resource. Bindings are never mutated; changing a role is
//! always a delete of one binding and a create of another.
//!
//! # Binding vs Row
//!
//! | Aspect | Binding | Row |
//! |--------|---------|-----|
//! | Granularity | One (principal, resource, role) | One (principal, resource) |
//! | Stored | Yes | No, derived by grouping bindings |
//! | Roles | Exactly one | Every catalog role, checked or not |

use crate::Role;
use rolebind_types::{Principal, Resource};
use serde::{Deserialize, Serialize};

/// One (principal, resource, role) grant.
///
/// # Example
///
/// ```
/// use rolebind_auth::{Binding, Role};
/// use rolebind_types::{Principal, ProjectRef, Resource, UserRef};
///
/// let binding = Binding::new(
///     Principal::User(UserRef::named("tom")),
///     Resource::Project(ProjectRef::named("home:tom")),
///     Role::Maintainer,
/// );
/// assert_eq!(binding.to_string(), "user:tom maintainer project:home:tom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
    pub principal: Principal,
    pub resource: Resource,
    pub role: Role,
}

impl Binding {
    #[must_use]
    pub fn new(principal: Principal, resource: Resource, role: Role) -> Self {
        Self {
            principal,
            resource,
            role,
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.principal, self.role, self.resource)
    }
}

/// Whether a role is bound after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleState {
    Bound,
    Unbound,
}

impl RoleState {
    #[must_use]
    pub fn is_bound(self) -> bool {
        matches!(self, Self::Bound)
    }

    /// The state a toggle moves to.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Bound => Self::Unbound,
            Self::Unbound => Self::Bound,
        }
    }
}

impl From<bool> for RoleState {
    fn from(bound: bool) -> Self {
        if bound {
            Self::Bound
        } else {
            Self::Unbound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolebind_types::{GroupRef, ProjectRef, UserRef};

    #[test]
    fn binding_equality_is_by_triple() {
        let project = Resource::Project(ProjectRef::named("home:tom"));
        let a = Binding::new(
            Principal::User(UserRef::named("tom")),
            project.clone(),
            Role::Reviewer,
        );
        let b = Binding::new(
            Principal::User(UserRef::named("tom")),
            project.clone(),
            Role::Reviewer,
        );
        let c = Binding::new(
            Principal::Group(GroupRef::named("tom")),
            project,
            Role::Reviewer,
        );

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn role_state_flips() {
        assert_eq!(RoleState::Bound.flipped(), RoleState::Unbound);
        assert_eq!(RoleState::Unbound.flipped().flipped(), RoleState::Unbound);
        assert!(RoleState::from(true).is_bound());
        assert!(!RoleState::from(false).is_bound());
    }

    #[test]
    fn serde_roundtrip() {
        let binding = Binding::new(
            Principal::Group(GroupRef::named("other_group")),
            Resource::Project(ProjectRef::named("openSUSE:Factory")),
            Role::Downloader,
        );
        let json = serde_json::to_string(&binding).expect("serialize");
        assert!(json.contains("\"role\":\"downloader\""), "got: {json}");
        let parsed: Binding = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, binding);
    }
}
