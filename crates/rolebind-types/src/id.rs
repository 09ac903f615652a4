//! Identifier types for rolebind.
//!
//! Every principal and resource is keyed by a UUID. Display strings
//! (logins, titles, project names) are labels only and never act as keys.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Namespace UUID for deterministic UUID v5 generation.
///
/// Used by the `from_name` constructors so that the same login or
/// project name maps to the same id across processes.
const ROLEBIND_NAMESPACE: Uuid = uuid!("5b0f3c52-8a1e-4d47-9b6e-2f1c7a9d4e30");

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random id (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a deterministic id (UUID v5) from a stable name.
            ///
            /// The kind prefix is mixed into the hash, so a user and a
            /// group with the same name still get distinct ids.
            #[must_use]
            pub fn from_name(name: &str) -> Self {
                let key = format!("{}:{}", $prefix, name);
                Self(Uuid::new_v5(&ROLEBIND_NAMESPACE, key.as_bytes()))
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier for a user account.
    ///
    /// # Example
    ///
    /// ```
    /// use rolebind_types::UserId;
    ///
    /// let a = UserId::from_name("other_user");
    /// let b = UserId::from_name("other_user");
    /// assert_eq!(a, b);
    /// assert_ne!(UserId::new(), UserId::new());
    /// ```
    UserId,
    "user"
);

define_id!(
    /// Identifier for a group.
    GroupId,
    "group"
);

define_id!(
    /// Identifier for a project.
    ProjectId,
    "project"
);

define_id!(
    /// Identifier for a package.
    PackageId,
    "package"
);
