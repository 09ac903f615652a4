//! Subcommands and their execution against a [`RoleBindingService`].

use clap::{Args as ClapArgs, Subcommand};
use rolebind_auth::Role;
use rolebind_runtime::{Notice, RoleBindingService, RowView, ServiceError};
use rolebind_types::{PackageRef, PrincipalKind, ProjectRef, Resource};

/// What to do.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a user to a project or package with the default role
    AddUser {
        /// Login of the user
        login: String,
        #[command(flatten)]
        target: Target,
    },

    /// Add a group to a project or package with the default role
    AddGroup {
        /// Title of the group
        title: String,
        #[command(flatten)]
        target: Target,
    },

    /// Flip one role of a user or group
    Toggle {
        #[command(flatten)]
        who: Who,
        /// Role to flip (maintainer, bugowner, reviewer, downloader, reader)
        #[arg(long)]
        role: Role,
        #[command(flatten)]
        target: Target,
    },

    /// Remove every role of a user or group
    Remove {
        #[command(flatten)]
        who: Who,
        #[command(flatten)]
        target: Target,
    },

    /// Show the role tables of a project or package
    List {
        #[command(flatten)]
        target: Target,
        /// Only show one table (user or group)
        #[arg(long)]
        kind: Option<PrincipalKind>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
}

/// The project, or a package inside it.
#[derive(ClapArgs, Debug, Clone)]
pub struct Target {
    /// Project name
    #[arg(long)]
    pub project: String,

    /// Package name inside the project
    #[arg(long)]
    pub package: Option<String>,
}

impl Target {
    pub fn resource(&self) -> Resource {
        let project = ProjectRef::named(self.project.as_str());
        match &self.package {
            Some(name) => Resource::Package(PackageRef::named(project, name.as_str())),
            None => Resource::Project(project),
        }
    }
}

/// The user or group a command acts on.
///
/// ```text
/// rolebind toggle user tom --role reviewer --project home:tom
/// rolebind remove group devs --project home:tom --package ctris
/// ```
#[derive(ClapArgs, Debug, Clone)]
pub struct Who {
    /// Principal kind: user or group
    pub kind: PrincipalKind,

    /// Login of the user or title of the group
    pub name: String,
}

/// Result of a successful command.
#[derive(Debug)]
pub enum Outcome {
    /// The store changed; persist it, then print the message.
    Changed(String),
    /// Nothing changed.
    Unchanged(String),
    /// Role tables to render.
    Tables {
        resource: Resource,
        tables: Vec<(PrincipalKind, Vec<RowView>)>,
        json: bool,
    },
}

/// Runs `command` against `service`.
///
/// # Errors
///
/// Whatever the service reports. The caller shows it through
/// [`ServiceError::notice`].
pub fn run(service: &RoleBindingService, command: &Command) -> Result<Outcome, ServiceError> {
    match command {
        Command::AddUser { login, target } => add(service, PrincipalKind::User, login, target),
        Command::AddGroup { title, target } => add(service, PrincipalKind::Group, title, target),
        Command::Toggle { who, role, target } => {
            let principal = service.resolve(who.kind, &who.name)?;
            let state = service.toggle_role(&principal, &target.resource(), *role)?;
            let verb = if state.is_bound() { "granted" } else { "revoked" };
            Ok(Outcome::Changed(format!(
                "Role {role} {verb} for {} {}",
                who.kind, who.name
            )))
        }
        Command::Remove { who, target } => {
            let principal = service.resolve(who.kind, &who.name)?;
            let removed = service.remove_principal(&principal, &target.resource());
            let message = format!("Removed {} {} ({removed} role(s))", who.kind, who.name);
            Ok(if removed == 0 {
                Outcome::Unchanged(message)
            } else {
                Outcome::Changed(message)
            })
        }
        Command::List { target, kind, json } => {
            let resource = target.resource();
            let kinds = match kind {
                Some(k) => vec![*k],
                None => PrincipalKind::ALL.to_vec(),
            };
            let tables = kinds
                .into_iter()
                .map(|k| (k, service.list_rows(&resource, k)))
                .collect();
            Ok(Outcome::Tables {
                resource,
                tables,
                json: *json,
            })
        }
    }
}

fn add(
    service: &RoleBindingService,
    kind: PrincipalKind,
    reference: &str,
    target: &Target,
) -> Result<Outcome, ServiceError> {
    service.add_principal(kind, reference, &target.resource())?;
    Ok(Outcome::Changed(Notice::added(kind, reference).to_string()))
}

/// Renders one role table as plain text.
///
/// ```text
/// User Roles
///   other_user    [x] maintainer  [ ] bugowner  [ ] reviewer  ...
/// ```
pub fn render_table(kind: PrincipalKind, rows: &[RowView]) -> String {
    let mut out = String::from(kind.section_title());
    out.push('\n');
    if rows.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for row in rows {
        let cells: Vec<String> = row
            .roles
            .iter()
            .map(|(role, checked)| format!("[{}] {role}", if *checked { 'x' } else { ' ' }))
            .collect();
        out.push_str(&format!("  {:<width$}  {}\n", row.name, cells.join("  ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolebind_runtime::{MemoryDirectory, MemoryRelationshipStore};
    use std::sync::Arc;

    fn service() -> RoleBindingService {
        let directory = MemoryDirectory::new();
        directory.add_user("tom");
        directory.add_group("devs");
        RoleBindingService::new(
            Arc::new(MemoryRelationshipStore::new()),
            Arc::new(directory),
        )
    }

    fn target(package: Option<&str>) -> Target {
        Target {
            project: "home:tom".into(),
            package: package.map(Into::into),
        }
    }

    fn user(login: &str) -> Who {
        Who {
            kind: PrincipalKind::User,
            name: login.into(),
        }
    }

    #[test]
    fn target_builds_project_or_package() {
        assert_eq!(
            target(None).resource(),
            Resource::Project(ProjectRef::named("home:tom"))
        );
        assert_eq!(target(Some("ctris")).resource().name(), "home:tom/ctris");
    }

    #[test]
    fn add_then_toggle_then_remove() {
        let service = service();

        let added = run(
            &service,
            &Command::AddUser {
                login: "tom".into(),
                target: target(None),
            },
        )
        .unwrap();
        assert!(matches!(added, Outcome::Changed(ref m) if m == "Added user tom with role maintainer"));

        let toggled = run(
            &service,
            &Command::Toggle {
                who: user("tom"),
                role: Role::Reviewer,
                target: target(None),
            },
        )
        .unwrap();
        assert!(matches!(toggled, Outcome::Changed(ref m) if m == "Role reviewer granted for user tom"));

        let removed = run(
            &service,
            &Command::Remove {
                who: user("tom"),
                target: target(None),
            },
        )
        .unwrap();
        assert!(matches!(removed, Outcome::Changed(ref m) if m == "Removed user tom (2 role(s))"));

        let again = run(
            &service,
            &Command::Remove {
                who: user("tom"),
                target: target(None),
            },
        )
        .unwrap();
        assert!(matches!(again, Outcome::Unchanged(_)));
    }

    #[test]
    fn toggle_unknown_user_fails_lookup() {
        let err = run(
            &service(),
            &Command::Toggle {
                who: user("Jimmy"),
                role: Role::Reader,
                target: target(None),
            },
        )
        .unwrap_err();
        assert_eq!(
            err.notice().to_string(),
            "Couldn't find User with login = Jimmy"
        );
    }

    #[test]
    fn toggle_unknown_group_names_the_group() {
        let err = run(
            &service(),
            &Command::Toggle {
                who: Who {
                    kind: PrincipalKind::Group,
                    name: "unknown group".into(),
                },
                role: Role::Reader,
                target: target(None),
            },
        )
        .unwrap_err();
        assert_eq!(err.notice().to_string(), "Couldn't find Group 'unknown group'");
    }

    #[test]
    fn list_returns_both_tables() {
        let service = service();
        run(
            &service,
            &Command::AddGroup {
                title: "devs".into(),
                target: target(Some("ctris")),
            },
        )
        .unwrap();

        let outcome = run(
            &service,
            &Command::List {
                target: target(Some("ctris")),
                kind: None,
                json: false,
            },
        )
        .unwrap();

        let Outcome::Tables { tables, .. } = outcome else {
            panic!("expected tables");
        };
        assert_eq!(tables.len(), 2);
        assert!(tables[0].1.is_empty());
        assert_eq!(tables[1].1.len(), 1);
    }

    #[test]
    fn render_marks_checked_roles() {
        let service = service();
        let resource = target(None).resource();
        service
            .add_principal(PrincipalKind::User, "tom", &resource)
            .unwrap();

        let text = render_table(PrincipalKind::User, &service.list_rows(&resource, PrincipalKind::User));
        assert!(text.starts_with("User Roles\n"));
        assert!(text.contains("tom  [x] maintainer  [ ] bugowner"));

        let empty = render_table(PrincipalKind::Group, &[]);
        assert_eq!(empty, "Group Roles\n  (none)\n");
    }
}
