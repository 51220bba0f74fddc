//! Report file sink

use crate::errors::{ReportError, Result};
use crate::session::RevisionSelector;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for rendered reports
pub trait ReportSink {
    /// Make the destination ready before any model loading starts
    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Write `contents` to `file_name`, replacing any previous report
    ///
    /// Returns the location the report was written to.
    fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

/// Writes reports as files in one output directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportSink for FileSink {
    fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ReportError::Config(format!(
                "Invalid report file name: '{}'",
                file_name
            )));
        }

        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(file_name);
        let mut file = fs::File::create(&path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        debug!(path = %path.display(), bytes = contents.len(), "Report written");
        Ok(path)
    }
}

/// File names for the role and entity reports of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFileNames {
    pub roles: String,
    pub entities: String,
}

/// `<project>_roles.csv` / `<project>_entities.csv`, with `_<revision>`
/// after the project name when `include_revision` is set
pub fn report_file_names(
    project_name: &str,
    revision: RevisionSelector,
    include_revision: bool,
) -> ReportFileNames {
    let stem = if include_revision {
        format!("{}_{}", project_name, revision)
    } else {
        project_name.to_string()
    };

    ReportFileNames {
        roles: format!("{}_roles.csv", stem),
        entities: format!("{}_entities.csv", stem),
    }
}
