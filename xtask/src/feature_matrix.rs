//! Feature-matrix checker.
//!
//! Drives the configured build command (by default `cargo check`) once per
//! feature combination of the catalog, baseline smoke run first, and stops at
//! the first combination that fails.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use featmatrix_catalog::{FlagCatalog, MatrixScope};
use featmatrix_runner::{DryRunRunner, ProcessRunner, Reporter, Runner, run_matrix, write_plan};
use tracing::info;

use crate::config::{ConfigError, HarnessConfig};

#[derive(Debug, Clone, Default, Args)]
pub struct FeatureMatrixArgs {
    /// Expand every alternative group as well as the independent flags
    #[arg(long)]
    pub full: bool,

    /// Print the commands that would run without executing them
    #[arg(long, conflicts_with = "list")]
    pub dry_run: bool,

    /// List the combinations and their commands, then exit
    #[arg(long)]
    pub list: bool,

    /// Write the run summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,
}

impl FeatureMatrixArgs {
    pub fn scope(&self) -> MatrixScope {
        if self.full { MatrixScope::Full } else { MatrixScope::Reduced }
    }
}

/// Run the matrix and return the process exit code.
///
/// Configuration problems are returned as errors before anything is built.
pub fn run(config: &HarnessConfig, args: &FeatureMatrixArgs) -> Result<i32> {
    let catalog = FlagCatalog::new(&config.catalog).map_err(ConfigError::from)?;
    let command = config.resolved_command();
    let scope = args.scope();

    if args.list {
        write_plan(&catalog, &command, scope, io::stdout()).context("failed to print plan")?;
        return Ok(0);
    }

    let total = catalog.combination_count(scope);
    info!(?scope, total, program = %command.program, dry_run = args.dry_run, "starting feature matrix");

    let mut runner: Box<dyn Runner> = if args.dry_run {
        Box::new(DryRunRunner::new(io::stdout()))
    } else {
        Box::new(ProcessRunner)
    };
    let reporter = Reporter::new(io::stdout(), scope, total, args.dry_run);
    let summary = run_matrix(&catalog, &command, scope, runner.as_mut(), reporter)
        .context("feature matrix run aborted")?;

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(summary.exit_code())
}
