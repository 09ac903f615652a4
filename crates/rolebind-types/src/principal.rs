//! Principal (role holder) types.
//!
//! A [`Principal`] is whoever can hold a role on a resource: a single
//! user or a group. The identity inside each variant is resolved once by
//! the directory and then carried around with its display name cached.
//!
//! # Equality
//!
//! Equality and hashing look at the variant tag and the id only. The
//! cached login/title is a label: two refs with the same id are the same
//! principal even if one of them carries a stale name.

use crate::{GroupId, UserId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A resolved user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    /// Stable key.
    pub id: UserId,
    /// Login name, cached for display and ordering.
    pub login: String,
}

impl UserRef {
    /// Creates a user ref with an explicit id.
    #[must_use]
    pub fn new(id: UserId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
        }
    }

    /// Creates a user ref whose id is derived from the login.
    #[must_use]
    pub fn named(login: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            id: UserId::from_name(&login),
            login,
        }
    }
}

impl PartialEq for UserRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserRef {}

impl Hash for UserRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A resolved group identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRef {
    /// Stable key.
    pub id: GroupId,
    /// Group title, cached for display and ordering.
    pub title: String,
}

impl GroupRef {
    /// Creates a group ref with an explicit id.
    #[must_use]
    pub fn new(id: GroupId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Creates a group ref whose id is derived from the title.
    #[must_use]
    pub fn named(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: GroupId::from_name(&title),
            title,
        }
    }
}

impl PartialEq for GroupRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GroupRef {}

impl Hash for GroupRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A role holder.
///
/// # Variants
///
/// | Variant | Resolved from | Display name |
/// |---------|---------------|--------------|
/// | `User` | login | login |
/// | `Group` | title | title |
///
/// # Example
///
/// ```
/// use rolebind_types::{Principal, PrincipalKind, UserRef};
///
/// let p = Principal::User(UserRef::named("other_user"));
/// assert_eq!(p.kind(), PrincipalKind::User);
/// assert_eq!(p.name(), "other_user");
/// assert_eq!(p.to_string(), "user:other_user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// An individual user account.
    User(UserRef),
    /// A group of users.
    Group(GroupRef),
}

impl Principal {
    /// Returns which kind of principal this is.
    #[must_use]
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Self::User(_) => PrincipalKind::User,
            Self::Group(_) => PrincipalKind::Group,
        }
    }

    /// Returns the cached display name (login or title).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(u) => &u.login,
            Self::Group(g) => &g.title,
        }
    }

    /// Returns the raw UUID of the identity, independent of kind.
    #[must_use]
    pub fn uuid(&self) -> uuid::Uuid {
        match self {
            Self::User(u) => u.id.uuid(),
            Self::Group(g) => g.id.uuid(),
        }
    }

    /// Returns `true` if this is a [`Principal::User`].
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Returns `true` if this is a [`Principal::Group`].
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the [`UserRef`] if this is a User, otherwise `None`.
    #[must_use]
    pub fn user(&self) -> Option<&UserRef> {
        match self {
            Self::User(u) => Some(u),
            Self::Group(_) => None,
        }
    }

    /// Returns the [`GroupRef`] if this is a Group, otherwise `None`.
    #[must_use]
    pub fn group(&self) -> Option<&GroupRef> {
        match self {
            Self::Group(g) => Some(g),
            Self::User(_) => None,
        }
    }
}

impl From<UserRef> for Principal {
    fn from(user: UserRef) -> Self {
        Self::User(user)
    }
}

impl From<GroupRef> for Principal {
    fn from(group: GroupRef) -> Self {
        Self::Group(group)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind().label(), self.name())
    }
}

/// The two kinds of principal.
///
/// Everything that differs between users and groups at the caller
/// boundary (labels, lookup field, headings) hangs off this type, so the
/// store and service stay kind-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    User,
    Group,
}

impl PrincipalKind {
    /// All kinds, users first.
    pub const ALL: [PrincipalKind; 2] = [PrincipalKind::User, PrincipalKind::Group];

    /// Lowercase label used in notices and field ids (`user`, `group`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }

    /// Capitalized type name (`User`, `Group`).
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Group => "Group",
        }
    }

    /// The directory field a reference is matched against.
    #[must_use]
    pub fn lookup_field(self) -> &'static str {
        match self {
            Self::User => "login",
            Self::Group => "title",
        }
    }

    /// Heading of the table listing principals of this kind.
    #[must_use]
    pub fn section_title(self) -> &'static str {
        match self {
            Self::User => "User Roles",
            Self::Group => "Group Roles",
        }
    }

    /// Title of the per-row remove action.
    #[must_use]
    pub fn remove_title(self) -> &'static str {
        match self {
            Self::User => "Remove user",
            Self::Group => "Remove group",
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PrincipalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            other => Err(format!("unknown principal kind '{other}'")),
        }
    }
}
