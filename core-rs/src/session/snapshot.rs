//! Snapshot-backed model session provider
//!
//! Serves working copies from exported model snapshots laid out as
//!
//! ```text
//! <root>/<project-id>/<branch>/<revision>.json   (or .yaml / .yml)
//! ```
//!
//! where `<branch>` is `mainline` or the branch name. A snapshot document
//! looks like:
//!
//! ```yaml
//! model:
//!   projectSecurities:
//!     - userRoles:
//!         - name: Admin
//!           moduleRoles: [Mod.Role1]
//!   domainModels:
//!     - module: Mod
//!       entities: []
//! ```
//!
//! A document without `model` yields a working copy that has no model.

use super::{is_plain_segment, BranchSelector, Credentials, ModelSessionProvider, ProjectModel, ProjectRef, RevisionSelector, WorkingCopy};
use crate::errors::{ReportError, Result};
use crate::model::{DomainModel, ProjectSecurity, UnitRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const SNAPSHOT_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];
const MAINLINE_DIR: &str = "mainline";

/// Exported snapshot file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub model: Option<SnapshotModel>,
}

/// Model section of a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotModel {
    #[serde(default)]
    pub project_securities: Vec<ProjectSecurity>,
    #[serde(default)]
    pub domain_models: Vec<DomainModel>,
}

impl SnapshotModel {
    fn security_id(index: usize) -> String {
        format!("security-{}", index)
    }

    fn domain_model_id(index: usize) -> String {
        format!("domain-model-{}", index)
    }
}

#[async_trait]
impl ProjectModel for SnapshotModel {
    fn all_project_securities(&self) -> Vec<UnitRef<ProjectSecurity>> {
        (0..self.project_securities.len())
            .map(|i| UnitRef::new(Self::security_id(i), None))
            .collect()
    }

    fn all_domain_models(&self) -> Vec<UnitRef<DomainModel>> {
        self.domain_models
            .iter()
            .enumerate()
            .map(|(i, dm)| UnitRef::new(Self::domain_model_id(i), Some(dm.module.clone())))
            .collect()
    }

    async fn load_project_security(&self, unit: &UnitRef<ProjectSecurity>) -> Result<ProjectSecurity> {
        self.project_securities
            .iter()
            .enumerate()
            .find(|(i, _)| Self::security_id(*i) == unit.id())
            .map(|(_, security)| security.clone())
            .ok_or_else(|| ReportError::Load(format!("Unknown project security unit: {}", unit)))
    }

    async fn load_domain_model(&self, unit: &UnitRef<DomainModel>) -> Result<DomainModel> {
        self.domain_models
            .iter()
            .enumerate()
            .find(|(i, _)| Self::domain_model_id(*i) == unit.id())
            .map(|(_, dm)| dm.clone())
            .ok_or_else(|| ReportError::Load(format!("Unknown domain model unit: {}", unit)))
    }
}

/// Working copy over one snapshot file
#[derive(Debug)]
pub struct SnapshotWorkingCopy {
    id: String,
    revision: RevisionSelector,
    model: Option<Arc<SnapshotModel>>,
}

impl WorkingCopy for SnapshotWorkingCopy {
    fn id(&self) -> &str {
        &self.id
    }

    fn revision(&self) -> RevisionSelector {
        self.revision
    }

    fn model(&self) -> Option<Arc<dyn ProjectModel>> {
        self.model
            .clone()
            .map(|model| model as Arc<dyn ProjectModel>)
    }
}

/// Provider reading snapshots below a root directory
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    root: PathBuf,
}

impl SnapshotProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SnapshotProvider { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the revisions of a project branch
    ///
    /// Project ids and branch names must stay inside the snapshot root.
    pub fn branch_dir(&self, project: &ProjectRef, branch: &BranchSelector) -> Result<PathBuf> {
        if project.id.is_empty() || !is_plain_segment(&project.id) {
            return Err(ReportError::Snapshot(format!(
                "project id '{}' is not a plain directory name",
                project.id
            )));
        }
        let branch_dir = branch.name().unwrap_or(MAINLINE_DIR);
        if !is_plain_segment(branch_dir) {
            return Err(ReportError::Snapshot(format!(
                "branch '{}' is not a plain directory name",
                branch_dir
            )));
        }
        Ok(self.root.join(&project.id).join(branch_dir))
    }

    /// Resolve a revision selector to a revision number and snapshot file
    pub async fn resolve_revision(
        &self,
        project: &ProjectRef,
        branch: &BranchSelector,
        revision: RevisionSelector,
    ) -> Result<(u64, PathBuf)> {
        let dir = self.branch_dir(project, branch)?;
        let revisions = list_revisions(&dir).await?;

        let wanted = match revision {
            RevisionSelector::Latest => revisions.iter().map(|(n, _)| *n).max(),
            RevisionSelector::Number(wanted) => Some(wanted),
        };
        let mut files: Vec<PathBuf> = revisions
            .into_iter()
            .filter(|(n, _)| Some(*n) == wanted)
            .map(|(_, path)| path)
            .collect();
        files.sort();

        match (wanted, files.len()) {
            (Some(number), 1) => Ok((number, files.remove(0))),
            (Some(number), count) if count > 1 => {
                let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
                Err(ReportError::Snapshot(format!(
                    "revision {} has more than one snapshot file: {}",
                    number,
                    names.join(", ")
                )))
            }
            _ => Err(ReportError::RevisionNotFound(format!(
                "{} of project {} on {} (looked in {})",
                revision,
                project.id,
                branch,
                dir.display()
            ))),
        }
    }

    /// Read and parse a snapshot file, choosing the format by extension
    pub async fn read_document(path: &Path) -> Result<SnapshotDocument> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ReportError::Snapshot(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let document = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                ReportError::Snapshot(format!("Invalid snapshot JSON in {}: {}", path.display(), e))
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                ReportError::Snapshot(format!("Invalid snapshot YAML in {}: {}", path.display(), e))
            })?
        };

        Ok(document)
    }
}

#[async_trait]
impl ModelSessionProvider for SnapshotProvider {
    async fn create_working_copy(
        &self,
        credentials: &Credentials,
        project: &ProjectRef,
        branch: &BranchSelector,
        revision: RevisionSelector,
    ) -> Result<Box<dyn WorkingCopy>> {
        info!(
            account = %credentials.account,
            project = %project.name,
            branch = %branch,
            revision = %revision,
            "Creating working copy"
        );

        let (number, path) = self.resolve_revision(project, branch, revision).await?;
        debug!(path = %path.display(), "Reading snapshot");
        let document = Self::read_document(&path).await?;

        Ok(Box::new(SnapshotWorkingCopy {
            id: format!("{}@{}:{}", project.id, branch, number),
            revision: RevisionSelector::Number(number),
            model: document.model.map(Arc::new),
        }))
    }
}

/// Revision-numbered snapshot files in a branch directory
async fn list_revisions(dir: &Path) -> Result<Vec<(u64, PathBuf)>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut revisions = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let extension_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SNAPSHOT_EXTENSIONS.contains(&e))
            .unwrap_or(false);
        if !extension_ok {
            continue;
        }
        if let Some(number) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok())
        {
            revisions.push((number, path));
        }
    }

    Ok(revisions)
}
