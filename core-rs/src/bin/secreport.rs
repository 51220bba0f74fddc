//! secreport - project security report CLI
//!
//! Writes the role and entity access reports of one project revision.
//! Settings are read from an optional YAML file, then a `.env` file in the
//! working directory, then the environment (MXACCOUNT, APIKEY, PROJECTID,
//! PROJECTNAME, BRANCHNAME, REVISION), then the flags below.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};

use secreport_core::config::{ConfigLayer, DEFAULT_ENV_FILE};
use secreport_core::{run, FileSink, ReportConfig, SnapshotProvider};

#[derive(Parser, Debug)]
#[command(name = "secreport")]
#[command(version = secreport_core::VERSION)]
#[command(about = "Flatten project security and entity access rules into CSV reports", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Project id (overrides PROJECTID)
    #[arg(long)]
    project_id: Option<String>,

    /// Project name, used in report file names (overrides PROJECTNAME)
    #[arg(long)]
    project_name: Option<String>,

    /// Branch name; omit or leave empty for the mainline (overrides BRANCHNAME)
    #[arg(long)]
    branch: Option<String>,

    /// Revision number; negative for the latest (overrides REVISION)
    #[arg(long, allow_hyphen_values = true)]
    revision: Option<i64>,

    /// Output directory for the reports
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Root directory of exported model snapshots
    #[arg(long)]
    snapshot_root: Option<PathBuf>,

    /// Include the revision number in report file names
    #[arg(long)]
    with_revision: bool,

    /// End every line with a trailing delimiter (legacy layout)
    #[arg(long)]
    legacy: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
            branch: self.branch.clone(),
            revision: self.revision,
            output_dir: self.out.clone(),
            snapshot_root: self.snapshot_root.clone(),
            include_revision_in_filename: self.with_revision.then_some(true),
            legacy_trailing_delimiter: self.legacy.then_some(true),
            ..ConfigLayer::default()
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ReportConfig> {
    let file_layer = match &cli.config {
        Some(path) => ConfigLayer::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConfigLayer::default(),
    };
    let dotenv_layer = ConfigLayer::from_env_file(DEFAULT_ENV_FILE)?;
    let env_layer = ConfigLayer::from_env().context("Invalid environment settings")?;

    Ok(ReportConfig::from_layer(
        file_layer
            .overlay(dotenv_layer)
            .overlay(env_layer)
            .overlay(cli.layer()),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let config = resolve_config(&cli)?;
    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);

    info!("Make sure all output files are closed before the run");
    match run(&provider, &config, &sink).await {
        Ok(summary) => {
            info!(
                revision = %summary.revision,
                role_rows = summary.role_rows,
                entity_rows = summary.entity_rows,
                "Done, check {}",
                config.output_dir.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
