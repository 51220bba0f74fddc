//! # Secreport Core - project security reports
//!
//! Loads a working copy of a project revision, takes its project security
//! and domain models, and flattens them into two semicolon-delimited
//! reports:
//!
//! - `<project>_roles.csv`: every user role / module role assignment
//! - `<project>_entities.csv`: every entity member access a user role
//!   receives through one of its module roles
//!
//! ## Architecture
//!
//! ```text
//!  ModelSessionProvider ──> WorkingCopy ──> ProjectModel
//!                                              │ load units
//!                                              ▼
//!                           LoadedProject (security + domain models)
//!                                              │ report builder
//!                                              ▼
//!                              Table ──render──> ReportSink
//! ```

pub mod config;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod sink;

pub use config::{ConfigLayer, ReportConfig};
pub use errors::{ReportError, Result};
pub use model::{AccessRights, AccessRule, DomainModel, Entity, MemberAccess, MemberRef, ProjectSecurity, UnitRef, UserRole};
pub use pipeline::{build_reports, load_project, run, LoadedProject, Reports, RunSummary};
pub use report::{Dialect, EntityAccessRow, Table};
pub use session::{BranchSelector, Credentials, ModelSessionProvider, ProjectModel, ProjectRef, RevisionSelector, SnapshotProvider, WorkingCopy};
pub use sink::{FileSink, ReportSink};

/// Version of the report layout
pub const VERSION: &str = "0.3.1";
