//! Row views for the role tables.

use rolebind_auth::{Role, RoleCatalog};
use rolebind_types::Principal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One principal's line in a role table.
///
/// Every catalog role is present in `roles`, checked or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub principal: Principal,
    pub name: String,
    pub roles: BTreeMap<Role, bool>,
}

impl RowView {
    /// Builds a row from the roles bound for `principal`.
    #[must_use]
    pub fn new(principal: Principal, bound: &BTreeSet<Role>) -> Self {
        Self {
            name: principal.name().to_string(),
            roles: RoleCatalog::display_state(bound),
            principal,
        }
    }

    /// Whether `role` is checked in this row.
    #[must_use]
    pub fn is_checked(&self, role: Role) -> bool {
        self.roles.get(&role).copied().unwrap_or(false)
    }

    /// Checked roles, in catalog order.
    pub fn checked_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(role, _)| *role)
    }

    /// Element id of the checkbox for `role`: `{kind}_{role}_{name}`.
    ///
    /// ```
    /// use rolebind_auth::Role;
    /// use rolebind_runtime::RowView;
    /// use rolebind_types::{Principal, UserRef};
    /// use std::collections::BTreeSet;
    ///
    /// let row = RowView::new(Principal::User(UserRef::named("user_tab_user")), &BTreeSet::new());
    /// assert_eq!(row.field_id(Role::Reviewer), "user_reviewer_user_tab_user");
    /// ```
    #[must_use]
    pub fn field_id(&self, role: Role) -> String {
        format!("{}_{}_{}", self.principal.kind().label(), role.title(), self.name)
    }
}
