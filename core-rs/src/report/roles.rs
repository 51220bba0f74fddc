//! User role to module role report

use super::table::Table;
use crate::model::UserRole;

pub const ROLE_REPORT_HEADER: [&str; 2] = ["User Role", "ModuleRole"];

/// One user role / module role assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRow<'a> {
    pub user_role: &'a str,
    pub module_role: &'a str,
}

/// One row per module role of each user role, in input order
///
/// Assignments are neither sorted nor de-duplicated.
pub fn role_rows(user_roles: &[UserRole]) -> Vec<RoleRow<'_>> {
    user_roles
        .iter()
        .flat_map(|role| {
            role.module_roles.iter().map(move |module_role| RoleRow {
                user_role: &role.name,
                module_role,
            })
        })
        .collect()
}

pub fn role_report(user_roles: &[UserRole]) -> Table {
    let mut table = Table::new(ROLE_REPORT_HEADER);
    for row in role_rows(user_roles) {
        table.push_row(vec![row.user_role.to_string(), row.module_role.to_string()]);
    }
    table
}
