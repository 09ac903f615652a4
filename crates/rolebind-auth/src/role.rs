//! The role catalog.
//!
//! A fixed, ordered set of grantable roles. Order is catalog position
//! and is used for display and sorting only; it carries no authorization
//! precedence (a maintainer is not implicitly a reader).
//!
//! | Position | Role | Title |
//! |----------|------|-------|
//! | 0 | [`Role::Maintainer`] | `maintainer` (default on add) |
//! | 1 | [`Role::Bugowner`] | `bugowner` |
//! | 2 | [`Role::Reviewer`] | `reviewer` |
//! | 3 | [`Role::Downloader`] | `downloader` |
//! | 4 | [`Role::Reader`] | `reader` |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A grantable role.
///
/// `Ord` follows catalog position, so a `BTreeSet<Role>` iterates in
/// display order.
///
/// # Example
///
/// ```
/// use rolebind_auth::Role;
///
/// assert!(Role::Maintainer < Role::Reader);
/// assert_eq!(Role::Bugowner.title(), "bugowner");
/// assert_eq!("reviewer".parse::<Role>().ok(), Some(Role::Reviewer));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Maintainer,
    Bugowner,
    Reviewer,
    Downloader,
    Reader,
}

impl Role {
    /// Lowercase title, as shown to callers and stored in snapshots.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Maintainer => "maintainer",
            Self::Bugowner => "bugowner",
            Self::Reviewer => "reviewer",
            Self::Downloader => "downloader",
            Self::Reader => "reader",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Error returned when parsing an unknown role title.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleCatalog::all_roles()
            .iter()
            .copied()
            .find(|role| role.title().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Static access to the catalog.
///
/// Pure lookup, no state. Exists as a type so the catalog has one place
/// to live and can be named at call sites (`RoleCatalog::default_role()`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleCatalog;

const ALL_ROLES: [Role; 5] = [
    Role::Maintainer,
    Role::Bugowner,
    Role::Reviewer,
    Role::Downloader,
    Role::Reader,
];

impl RoleCatalog {
    /// The role a principal receives when first added to a resource.
    #[must_use]
    pub fn default_role() -> Role {
        Role::Maintainer
    }

    /// Every role, in display order.
    #[must_use]
    pub fn all_roles() -> &'static [Role] {
        &ALL_ROLES
    }

    /// Expands a bound role set into a checked/unchecked map covering
    /// every catalog role.
    ///
    /// # Example
    ///
    /// ```
    /// use rolebind_auth::{Role, RoleCatalog};
    /// use std::collections::BTreeSet;
    ///
    /// let bound = BTreeSet::from([Role::Maintainer, Role::Bugowner]);
    /// let state = RoleCatalog::display_state(&bound);
    ///
    /// assert_eq!(state.len(), 5);
    /// assert!(state[&Role::Bugowner]);
    /// assert!(!state[&Role::Reader]);
    /// ```
    #[must_use]
    pub fn display_state(bound: &BTreeSet<Role>) -> BTreeMap<Role, bool> {
        ALL_ROLES
            .iter()
            .map(|role| (*role, bound.contains(role)))
            .collect()
    }
}
