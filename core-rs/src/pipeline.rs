//! Report run pipeline
//!
//! Stages run strictly in order: working copy, project security, domain
//! models, reports, files. Domain models are loaded concurrently and the
//! run waits for all of them. Any stage failure aborts the run before a
//! report is written.

use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::ReportConfig;
use crate::errors::{ReportError, Result};
use crate::model::{DomainModel, ProjectSecurity};
use crate::report::{entity_report, role_report, Table};
use crate::session::{ModelSessionProvider, ProjectModel, ProjectRef, RevisionSelector};
use crate::sink::{report_file_names, ReportSink};

/// Model taken from a freshly created working copy
pub struct AcquiredModel {
    pub working_copy_id: String,
    pub revision: RevisionSelector,
    pub model: Arc<dyn ProjectModel>,
}

/// Everything the report builder needs, fully loaded
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProject {
    pub project: ProjectRef,
    pub working_copy_id: String,
    pub revision: RevisionSelector,
    pub security: ProjectSecurity,
    pub domain_models: Vec<DomainModel>,
}

/// Rendered-ready report tables
#[derive(Debug, Clone, PartialEq)]
pub struct Reports {
    pub roles: Table,
    pub entities: Table,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub revision: RevisionSelector,
    pub roles_path: PathBuf,
    pub entities_path: PathBuf,
    pub role_rows: usize,
    pub entity_rows: usize,
}

pub async fn acquire_model(
    provider: &dyn ModelSessionProvider,
    config: &ReportConfig,
) -> Result<AcquiredModel> {
    let working_copy = provider
        .create_working_copy(
            &config.credentials,
            &config.project,
            &config.branch,
            config.revision,
        )
        .await?;

    info!(working_copy = working_copy.id(), "Retrieving model");
    let model = working_copy
        .model()
        .ok_or_else(|| ReportError::ModelUnavailable("What model?".to_string()))?;

    Ok(AcquiredModel {
        working_copy_id: working_copy.id().to_string(),
        revision: working_copy.revision(),
        model,
    })
}

/// Load the first project security unit of the model
pub async fn load_project_security(
    model: &dyn ProjectModel,
    working_copy_id: &str,
) -> Result<ProjectSecurity> {
    info!("Loading project security");
    let units = model.all_project_securities();
    let unit = units
        .first()
        .ok_or_else(|| ReportError::SecurityAbsent(working_copy_id.to_string()))?;

    let security = model.load_project_security(unit).await?;
    info!(user_roles = security.user_roles.len(), "Received project security");
    Ok(security)
}

/// Load every domain model, in unit order
pub async fn load_domain_models(model: &dyn ProjectModel) -> Result<Vec<DomainModel>> {
    info!("Loading domain models");
    let units = model.all_domain_models();
    let domain_models = try_join_all(units.iter().map(|unit| model.load_domain_model(unit))).await?;
    info!(domain_models = domain_models.len(), "Received domain models");
    Ok(domain_models)
}

pub async fn load_project(
    provider: &dyn ModelSessionProvider,
    config: &ReportConfig,
) -> Result<LoadedProject> {
    let acquired = acquire_model(provider, config).await?;
    let security = load_project_security(acquired.model.as_ref(), &acquired.working_copy_id).await?;
    let domain_models = load_domain_models(acquired.model.as_ref()).await?;

    info!("Everything is loaded");
    Ok(LoadedProject {
        project: config.project.clone(),
        working_copy_id: acquired.working_copy_id,
        revision: acquired.revision,
        security,
        domain_models,
    })
}

pub fn build_reports(project: &LoadedProject) -> Reports {
    let user_roles = &project.security.user_roles;
    Reports {
        roles: role_report(user_roles),
        entities: entity_report(user_roles, &project.domain_models),
    }
}

/// Load the project, build both reports and write them to `sink`
pub async fn run(
    provider: &dyn ModelSessionProvider,
    config: &ReportConfig,
    sink: &dyn ReportSink,
) -> Result<RunSummary> {
    config.validate()?;
    sink.prepare()?;

    let project = load_project(provider, config).await?;
    let reports = build_reports(&project);
    let dialect = config.dialect();
    let names = report_file_names(
        &config.project.name,
        project.revision,
        config.include_revision_in_filename,
    );

    info!(file = %names.roles, rows = reports.roles.len(), "Writing security roles");
    let roles_path = sink.write_report(&names.roles, &reports.roles.render(&dialect))?;

    info!(file = %names.entities, rows = reports.entities.len(), "Writing entity access");
    let entities_path = sink.write_report(&names.entities, &reports.entities.render(&dialect))?;

    Ok(RunSummary {
        revision: project.revision,
        roles_path,
        entities_path,
        role_rows: reports.roles.len(),
        entity_rows: reports.entities.len(),
    })
}
