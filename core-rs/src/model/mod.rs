//! Project model snapshot types
//!
//! Read-only view of the parts of a project model the reports consume:
//! the project security (user roles and their module roles) and the
//! domain models (entities and their access rules).
//!
//! Values are produced by a [`crate::session::ProjectModel`] once a unit has
//! been loaded. Nothing in this crate mutates them.

pub mod unit;

pub use unit::UnitRef;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved project security unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSecurity {
    #[serde(default)]
    pub user_roles: Vec<UserRole>,
}

/// A user role and the qualified names of the module roles assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub name: String,
    #[serde(default, alias = "moduleRolesQualifiedNames")]
    pub module_roles: Vec<String>,
}

impl UserRole {
    pub fn new(name: impl Into<String>, module_roles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            module_roles,
        }
    }
}

/// Resolved domain model of one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainModel {
    /// Qualified module name (e.g. "Administration")
    #[serde(alias = "qualifiedName")]
    pub module: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub access_rules: Vec<AccessRule>,
}

/// Entity access rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    pub id: String,
    #[serde(default)]
    pub documentation: String,
    /// XPath constraint limiting the rows the rule grants access to
    #[serde(default)]
    pub x_path_constraint: String,
    #[serde(default, alias = "moduleRolesQualifiedNames")]
    pub module_roles: Vec<String>,
    #[serde(default)]
    pub member_accesses: Vec<MemberAccess>,
}

impl AccessRule {
    /// Whether the rule lists the given module role
    pub fn applies_to(&self, module_role: &str) -> bool {
        self.module_roles.iter().any(|r| r == module_role)
    }
}

/// The member a [`MemberAccess`] grants rights on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Attribute(String),
    Association(String),
}

impl MemberRef {
    pub fn name(&self) -> &str {
        match self {
            MemberRef::Attribute(name) | MemberRef::Association(name) => name,
        }
    }
}

/// Permission record for one member within an access rule
///
/// `member` is `None` when the platform returned neither an attribute nor an
/// association; such records produce no report rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMemberAccess", into = "RawMemberAccess")]
pub struct MemberAccess {
    pub member: Option<MemberRef>,
    pub access_rights: AccessRights,
}

impl MemberAccess {
    pub fn attribute(name: impl Into<String>, access_rights: AccessRights) -> Self {
        Self {
            member: Some(MemberRef::Attribute(name.into())),
            access_rights,
        }
    }

    pub fn association(name: impl Into<String>, access_rights: AccessRights) -> Self {
        Self {
            member: Some(MemberRef::Association(name.into())),
            access_rights,
        }
    }

    pub fn unresolved(access_rights: AccessRights) -> Self {
        Self {
            member: None,
            access_rights,
        }
    }
}

/// Named reference as it appears in exported snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedRef {
    name: String,
}

/// Platform shape of a member access: two optional references
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMemberAccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    association: Option<NamedRef>,
    #[serde(default)]
    access_rights: AccessRights,
}

impl From<RawMemberAccess> for MemberAccess {
    fn from(raw: RawMemberAccess) -> Self {
        // Attribute is checked first, an association only counts without one
        let member = match (raw.attribute, raw.association) {
            (Some(attr), _) => Some(MemberRef::Attribute(attr.name)),
            (None, Some(assoc)) => Some(MemberRef::Association(assoc.name)),
            (None, None) => None,
        };
        MemberAccess {
            member,
            access_rights: raw.access_rights,
        }
    }
}

impl From<MemberAccess> for RawMemberAccess {
    fn from(access: MemberAccess) -> Self {
        let (attribute, association) = match access.member {
            Some(MemberRef::Attribute(name)) => (Some(NamedRef { name }), None),
            Some(MemberRef::Association(name)) => (None, Some(NamedRef { name })),
            None => (None, None),
        };
        RawMemberAccess {
            attribute,
            association,
            access_rights: access.access_rights,
        }
    }
}

/// Member access rights level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessRights {
    #[default]
    None,
    ReadOnly,
    ReadWrite,
}

impl AccessRights {
    /// Enumeration name as the platform reports it
    pub fn name(&self) -> &'static str {
        match self {
            AccessRights::None => "None",
            AccessRights::ReadOnly => "ReadOnly",
            AccessRights::ReadWrite => "ReadWrite",
        }
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
