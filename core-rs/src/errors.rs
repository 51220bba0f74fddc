//! Error types for the security report generator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Project security is undefined for working copy {0}")]
    SecurityAbsent(String),

    #[error("Revision not found: {0}")]
    RevisionNotFound(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
