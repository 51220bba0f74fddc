//! Report run configuration
//!
//! Settings come from four layers, later ones winning:
//! an optional YAML file, a `.env` file in the working directory, the
//! process environment, then command-line flags.
//! Every layer is a [`ConfigLayer`]; [`ReportConfig::from_layer`] fills in
//! defaults for anything still unset.
//!
//! ```yaml
//! account: dev@example.com
//! apiKey: 0123-4567
//! projectId: 7e0c2a4f-shop
//! projectName: Shop
//! branch: release-2
//! revision: 118
//! outputDir: out
//! includeRevisionInFilename: true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::errors::{ReportError, Result};
use crate::report::Dialect;
use crate::session::{is_plain_segment, BranchSelector, Credentials, ProjectRef, RevisionSelector};

pub const ENV_ACCOUNT: &str = "MXACCOUNT";
pub const ENV_API_KEY: &str = "APIKEY";
pub const ENV_PROJECT_ID: &str = "PROJECTID";
pub const ENV_PROJECT_NAME: &str = "PROJECTNAME";
pub const ENV_BRANCH: &str = "BRANCHNAME";
pub const ENV_REVISION: &str = "REVISION";
pub const ENV_OUTPUT_DIR: &str = "REPORT_OUT_DIR";
pub const ENV_SNAPSHOT_ROOT: &str = "SNAPSHOT_ROOT";

pub const PLACEHOLDER_ACCOUNT: &str = "YOUR ACCOUNT";
pub const PLACEHOLDER_API_KEY: &str = "YOUR API KEY";
pub const PLACEHOLDER_PROJECT_ID: &str = "PROJECT ID";
pub const PLACEHOLDER_PROJECT_NAME: &str = "PROJECT NAME";

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_OUTPUT_DIR: &str = "out";
pub const DEFAULT_SNAPSHOT_ROOT: &str = "snapshots";

/// One layer of partially specified settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Negative values select the latest revision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_revision_in_filename: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_trailing_delimiter: Option<bool>,
}

impl ConfigLayer {
    /// Load a YAML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ReportError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let layer: ConfigLayer = serde_yaml::from_str(&content).map_err(|e| {
            ReportError::Config(format!("Invalid config YAML in {}: {}", path.display(), e))
        })?;

        Ok(layer)
    }

    /// Read the environment keys through `lookup`
    ///
    /// Unset and empty values are both treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let revision = match get(ENV_REVISION) {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                ReportError::Config(format!("{} must be an integer, got '{}'", ENV_REVISION, raw))
            })?),
            None => None,
        };

        Ok(ConfigLayer {
            account: get(ENV_ACCOUNT),
            api_key: get(ENV_API_KEY),
            project_id: get(ENV_PROJECT_ID),
            project_name: get(ENV_PROJECT_NAME),
            branch: get(ENV_BRANCH),
            revision,
            output_dir: get(ENV_OUTPUT_DIR).map(PathBuf::from),
            snapshot_root: get(ENV_SNAPSHOT_ROOT).map(PathBuf::from),
            include_revision_in_filename: None,
            legacy_trailing_delimiter: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the environment keys from a dotenv file
    ///
    /// A missing file is an empty layer. The process environment is left
    /// untouched, so layering [`ConfigLayer::from_env`] on top keeps real
    /// environment variables ahead of the file.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |e: dotenvy::Error| {
            ReportError::Config(format!("Invalid env file {}: {}", path.display(), e))
        };

        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) if e.not_found() => return Ok(ConfigLayer::default()),
            Err(e) => return Err(invalid(e)),
        };

        let mut values = HashMap::new();
        for entry in entries {
            let (key, value) = entry.map_err(invalid)?;
            values.insert(key, value);
        }
        Self::from_lookup(|key| values.get(key).cloned())
    }

    /// Layer `top` over `self`; set fields in `top` win
    pub fn overlay(self, top: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            account: top.account.or(self.account),
            api_key: top.api_key.or(self.api_key),
            project_id: top.project_id.or(self.project_id),
            project_name: top.project_name.or(self.project_name),
            branch: top.branch.or(self.branch),
            revision: top.revision.or(self.revision),
            output_dir: top.output_dir.or(self.output_dir),
            snapshot_root: top.snapshot_root.or(self.snapshot_root),
            include_revision_in_filename: top
                .include_revision_in_filename
                .or(self.include_revision_in_filename),
            legacy_trailing_delimiter: top
                .legacy_trailing_delimiter
                .or(self.legacy_trailing_delimiter),
        }
    }
}

/// Fully resolved settings for one report run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub credentials: Credentials,
    pub project: ProjectRef,
    pub branch: BranchSelector,
    pub revision: RevisionSelector,
    pub output_dir: PathBuf,
    pub snapshot_root: PathBuf,
    pub include_revision_in_filename: bool,
    pub legacy_trailing_delimiter: bool,
}

impl ReportConfig {
    /// Resolve a layer, falling back to placeholders and defaults
    pub fn from_layer(layer: ConfigLayer) -> Self {
        ReportConfig {
            credentials: Credentials {
                account: layer.account.unwrap_or_else(|| PLACEHOLDER_ACCOUNT.to_string()),
                api_key: layer.api_key.unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string()),
            },
            project: ProjectRef {
                id: layer.project_id.unwrap_or_else(|| PLACEHOLDER_PROJECT_ID.to_string()),
                name: layer
                    .project_name
                    .unwrap_or_else(|| PLACEHOLDER_PROJECT_NAME.to_string()),
            },
            branch: BranchSelector::from_name(layer.branch.as_deref()),
            revision: layer
                .revision
                .map(RevisionSelector::from_number)
                .unwrap_or_default(),
            output_dir: layer
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            snapshot_root: layer
                .snapshot_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_ROOT)),
            include_revision_in_filename: layer.include_revision_in_filename.unwrap_or(false),
            legacy_trailing_delimiter: layer.legacy_trailing_delimiter.unwrap_or(false),
        }
    }

    /// Resolve from an environment lookup alone
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self::from_layer(ConfigLayer::from_lookup(lookup)?))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::from_layer(ConfigLayer::from_env()?))
    }

    /// Check the project identity can name a run and its output files
    pub fn validate(&self) -> Result<()> {
        if self.project.id.trim().is_empty() {
            return Err(ReportError::Config("project id cannot be empty".to_string()));
        }

        if !is_plain_segment(&self.project.id) {
            return Err(ReportError::Config(format!(
                "project id '{}' cannot contain path separators or '..'",
                self.project.id
            )));
        }

        if let Some(branch) = self.branch.name() {
            if !is_plain_segment(branch) {
                return Err(ReportError::Config(format!(
                    "branch name '{}' cannot contain path separators or '..'",
                    branch
                )));
            }
        }

        if self.project.name.trim().is_empty() {
            return Err(ReportError::Config("project name cannot be empty".to_string()));
        }

        if self.project.name.contains(['/', '\\']) {
            return Err(ReportError::Config(format!(
                "project name '{}' cannot contain path separators",
                self.project.name
            )));
        }

        for setting in self.placeholder_settings() {
            warn!(setting, "Using placeholder value, set it in the environment or config file");
        }

        Ok(())
    }

    /// Settings still holding their placeholder value
    pub fn placeholder_settings(&self) -> Vec<&'static str> {
        let checks = [
            (ENV_ACCOUNT, self.credentials.account.as_str(), PLACEHOLDER_ACCOUNT),
            (ENV_API_KEY, self.credentials.api_key.as_str(), PLACEHOLDER_API_KEY),
            (ENV_PROJECT_ID, self.project.id.as_str(), PLACEHOLDER_PROJECT_ID),
            (ENV_PROJECT_NAME, self.project.name.as_str(), PLACEHOLDER_PROJECT_NAME),
        ];
        checks
            .into_iter()
            .filter(|(_, value, placeholder)| value == placeholder)
            .map(|(key, _, _)| key)
            .collect()
    }

    pub fn dialect(&self) -> Dialect {
        if self.legacy_trailing_delimiter {
            Dialect::legacy()
        } else {
            Dialect::default()
        }
    }
}
