//! Model session provider contract
//!
//! The reports are built from a working copy of one project revision. The
//! platform side of that (authentication, revision checkout, loading model
//! units) sits behind [`ModelSessionProvider`], [`WorkingCopy`] and
//! [`ProjectModel`]. [`SnapshotProvider`] implements them over exported
//! model snapshots on disk.

pub mod snapshot;

pub use snapshot::SnapshotProvider;

use crate::errors::Result;
use crate::model::{DomainModel, ProjectSecurity, UnitRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Platform account credentials
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub account: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Project identity on the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// True when `value` names a single directory, with no separators or `..`
pub fn is_plain_segment(value: &str) -> bool {
    !value.contains(['/', '\\']) && !value.contains("..")
}

/// Branch a working copy is created from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BranchSelector {
    #[default]
    Mainline,
    Named(String),
}

impl BranchSelector {
    /// Empty or missing names select the mainline
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => BranchSelector::Named(name.to_string()),
            _ => BranchSelector::Mainline,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            BranchSelector::Mainline => None,
            BranchSelector::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for BranchSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchSelector::Mainline => write!(f, "mainline"),
            BranchSelector::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Revision a working copy is created from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevisionSelector {
    #[default]
    Latest,
    Number(u64),
}

impl RevisionSelector {
    /// Negative revision numbers select the latest revision
    pub fn from_number(number: i64) -> Self {
        u64::try_from(number)
            .map(RevisionSelector::Number)
            .unwrap_or(RevisionSelector::Latest)
    }
}

impl fmt::Display for RevisionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionSelector::Latest => write!(f, "latest"),
            RevisionSelector::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Opens working copies of project revisions
#[async_trait]
pub trait ModelSessionProvider: Send + Sync {
    async fn create_working_copy(
        &self,
        credentials: &Credentials,
        project: &ProjectRef,
        branch: &BranchSelector,
        revision: RevisionSelector,
    ) -> Result<Box<dyn WorkingCopy>>;
}

/// Checked-out view of one project revision
pub trait WorkingCopy: Send + Sync {
    fn id(&self) -> &str;

    /// Revision the working copy was resolved to
    fn revision(&self) -> RevisionSelector;

    /// Project model, if the working copy has one
    fn model(&self) -> Option<Arc<dyn ProjectModel>>;
}

/// Model of a working copy
///
/// Units are listed as unresolved [`UnitRef`]s; their contents are valid only
/// once the matching `load_*` call has completed.
#[async_trait]
pub trait ProjectModel: Send + Sync {
    fn all_project_securities(&self) -> Vec<UnitRef<ProjectSecurity>>;

    fn all_domain_models(&self) -> Vec<UnitRef<DomainModel>>;

    async fn load_project_security(&self, unit: &UnitRef<ProjectSecurity>) -> Result<ProjectSecurity>;

    async fn load_domain_model(&self, unit: &UnitRef<DomainModel>) -> Result<DomainModel>;
}
