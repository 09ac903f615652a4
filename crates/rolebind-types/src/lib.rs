//! Core identity types for rolebind.
//!
//! # Crate Architecture
//!
//! ```text
//! rolebind-types    (ids, Principal, Resource, ErrorCode)  ◄── HERE
//!       ↑
//! rolebind-auth     (Role catalog, Binding, RelationshipStore / Directory traits)
//!       ↑
//! rolebind-runtime  (MemoryRelationshipStore, RoleBindingService, config, snapshots)
//!       ↑
//! rolebind-cli      (rolebind binary)
//! ```
//!
//! Principals and resources are sum types: a [`Principal`] is a user or
//! a group, a [`Resource`] is a project or a package. Everything above
//! this crate is written once against these enums instead of once per
//! kind.
//!
//! # Example
//!
//! ```
//! use rolebind_types::{GroupRef, Principal, ProjectRef, Resource, UserRef};
//!
//! let tom = Principal::User(UserRef::named("tom"));
//! let admins = Principal::Group(GroupRef::named("admins"));
//! let home = Resource::Project(ProjectRef::named("home:tom"));
//!
//! assert_ne!(tom, admins);
//! assert_eq!(home.name(), "home:tom");
//! ```

mod error;
mod id;
mod principal;
mod resource;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{GroupId, PackageId, ProjectId, UserId};
pub use principal::{GroupRef, Principal, PrincipalKind, UserRef};
pub use resource::{PackageRef, ProjectRef, Resource, ResourceKind};
