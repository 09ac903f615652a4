//! Protected resource types.
//!
//! A [`Resource`] is what roles are granted on: a project, or a package
//! inside a project. A package records its owning project, but bindings
//! on the package never derive from bindings on the project.

use crate::{PackageId, ProjectId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A project identity with its cached name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub name: String,
}

impl ProjectRef {
    #[must_use]
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a project ref whose id is derived from the name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ProjectId::from_name(&name),
            name,
        }
    }
}

impl PartialEq for ProjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProjectRef {}

impl Hash for ProjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A package identity, its cached name and its owning project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRef {
    pub id: PackageId,
    pub project: ProjectRef,
    pub name: String,
}

impl PackageRef {
    #[must_use]
    pub fn new(id: PackageId, project: ProjectRef, name: impl Into<String>) -> Self {
        Self {
            id,
            project,
            name: name.into(),
        }
    }

    /// Creates a package ref whose id is derived from `project/name`.
    #[must_use]
    pub fn named(project: ProjectRef, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = PackageId::from_name(&format!("{}/{}", project.name, name));
        Self { id, project, name }
    }
}

impl PartialEq for PackageRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PackageRef {}

impl Hash for PackageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A resource roles can be granted on.
///
/// # Example
///
/// ```
/// use rolebind_types::{PackageRef, ProjectRef, Resource, ResourceKind};
///
/// let project = ProjectRef::named("home:tom");
/// let package = Resource::Package(PackageRef::named(project.clone(), "hello"));
///
/// assert_eq!(package.kind(), ResourceKind::Package);
/// assert_eq!(package.name(), "home:tom/hello");
/// assert_eq!(package.project(), &project);
/// assert_ne!(package, Resource::Project(project));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resource {
    Project(ProjectRef),
    Package(PackageRef),
}

impl Resource {
    /// Returns which kind of resource this is.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Project(_) => ResourceKind::Project,
            Self::Package(_) => ResourceKind::Package,
        }
    }

    /// Display name: `project` or `project/package`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Project(p) => p.name.clone(),
            Self::Package(p) => format!("{}/{}", p.project.name, p.name),
        }
    }

    /// The project this resource is, or belongs to.
    #[must_use]
    pub fn project(&self) -> &ProjectRef {
        match self {
            Self::Project(p) => p,
            Self::Package(p) => &p.project,
        }
    }

    /// Returns the raw UUID of the identity, independent of kind.
    #[must_use]
    pub fn uuid(&self) -> uuid::Uuid {
        match self {
            Self::Project(p) => p.id.uuid(),
            Self::Package(p) => p.id.uuid(),
        }
    }
}

impl From<ProjectRef> for Resource {
    fn from(project: ProjectRef) -> Self {
        Self::Project(project)
    }
}

impl From<PackageRef> for Resource {
    fn from(package: PackageRef) -> Self {
        Self::Package(package)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.name())
    }
}

/// The two kinds of resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    Package,
}

impl ResourceKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Package => "package",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_resource() {
        let project = Resource::Project(ProjectRef::named("home:tom"));
        assert_eq!(project.kind(), ResourceKind::Project);
        assert_eq!(project.name(), "home:tom");
        assert_eq!(project.to_string(), "project:home:tom");
    }

    #[test]
    fn package_is_distinct_from_its_project() {
        let project = ProjectRef::named("openSUSE:Factory");
        let package = PackageRef::named(project.clone(), "bash");

        let a = Resource::from(project);
        let b = Resource::from(package);
        assert_ne!(a, b);
        assert_eq!(b.project(), a.project());
    }

    #[test]
    fn same_package_name_in_different_projects() {
        let a = PackageRef::named(ProjectRef::named("one"), "pkg");
        let b = PackageRef::named(ProjectRef::named("two"), "pkg");
        assert_ne!(a, b);
    }

    #[test]
    fn equality_ignores_cached_name() {
        let id = ProjectId::new();
        assert_eq!(ProjectRef::new(id, "before"), ProjectRef::new(id, "after"));
    }

    #[test]
    fn serde_roundtrip() {
        let resource = Resource::Package(PackageRef::named(ProjectRef::named("home:tom"), "hello"));
        let json = serde_json::to_string(&resource).expect("serialize");
        let parsed: Resource = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, resource);
        assert_eq!(parsed.name(), "home:tom/hello");
    }
}
