//! Entity access report
//!
//! Joins user roles, their module roles, every domain model entity and the
//! access rules that list the module role, fanning out to one row per member
//! access. Iteration order is role, module role, module, entity, rule,
//! member access.
//!
//! A rule that lists several module roles of the same user role is visited
//! once per module role, so it appears once under each of them.

use super::normalize::normalize_free_text;
use super::table::Table;
use crate::model::{DomainModel, UserRole};

pub const ENTITY_REPORT_HEADER: [&str; 9] = [
    "UserRole",
    "ModuleRole",
    "Module",
    "Entity",
    "Attribute",
    "Description",
    "XPath Constraint",
    "Accessrights",
    "AccessRule ID",
];

/// One member access granted to a user role through a module role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityAccessRow {
    pub user_role: String,
    pub module_role: String,
    pub module: String,
    pub entity: String,
    /// Attribute or association name
    pub member: String,
    pub documentation: String,
    pub x_path_constraint: String,
    pub access_rights: &'static str,
    pub access_rule_id: String,
}

impl EntityAccessRow {
    pub fn into_fields(self) -> Vec<String> {
        vec![
            self.user_role,
            self.module_role,
            self.module,
            self.entity,
            self.member,
            self.documentation,
            self.x_path_constraint,
            self.access_rights.to_string(),
            self.access_rule_id,
        ]
    }
}

pub fn entity_access_rows(
    user_roles: &[UserRole],
    domain_models: &[DomainModel],
) -> Vec<EntityAccessRow> {
    let mut rows = Vec::new();

    for user_role in user_roles {
        for module_role in &user_role.module_roles {
            for domain_model in domain_models {
                for entity in &domain_model.entities {
                    let rules = entity
                        .access_rules
                        .iter()
                        .filter(|rule| rule.applies_to(module_role));

                    for rule in rules {
                        let documentation = normalize_free_text(&rule.documentation);
                        let x_path_constraint = normalize_free_text(&rule.x_path_constraint);

                        for access in &rule.member_accesses {
                            // Member accesses without attribute or association are skipped
                            let Some(member) = &access.member else {
                                continue;
                            };
                            rows.push(EntityAccessRow {
                                user_role: user_role.name.clone(),
                                module_role: module_role.clone(),
                                module: domain_model.module.clone(),
                                entity: entity.name.clone(),
                                member: member.name().to_string(),
                                documentation: documentation.clone(),
                                x_path_constraint: x_path_constraint.clone(),
                                access_rights: access.access_rights.name(),
                                access_rule_id: rule.id.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    rows
}

pub fn entity_report(user_roles: &[UserRole], domain_models: &[DomainModel]) -> Table {
    let mut table = Table::new(ENTITY_REPORT_HEADER);
    for row in entity_access_rows(user_roles, domain_models) {
        table.push_row(row.into_fields());
    }
    table
}
