// featmatrix task runner
// Drives the feature matrix against the configured build tool.

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use featmatrix_runner::exit::{EXIT_BUILD_FAILURE, EXIT_CONFIG_ERROR};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use xtask::config::{ConfigError, ConfigSource, HarnessConfig, LogFormat, LoggingConfig};
use xtask::feature_matrix::{self, FeatureMatrixArgs};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "featmatrix development tasks")]
#[command(long_about = r#"
Builds a crate once per feature combination and fails on the first broken one.

Examples:
  # Baseline plus every subset of the independent flags
  cargo xtask feature-matrix

  # Also expand the alternative groups
  cargo xtask feature-matrix --full

  # Show what would run
  cargo xtask feature-matrix --full --list
"#)]
#[command(version)]
struct Cli {
    /// Configuration file path (default: featmatrix.toml, or $FEATMATRIX_CONFIG)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every feature combination, stopping at the first failure
    #[command(alias = "fm")]
    FeatureMatrix(FeatureMatrixArgs),
}

fn main() {
    let cli = Cli::parse();

    let (config, source) = match HarnessConfig::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            // Logging is not configured yet.
            setup_logging(&LoggingConfig::default(), cli.log_level.as_deref());
            report_error(&anyhow::Error::new(e));
            exit(EXIT_CONFIG_ERROR);
        }
    };

    setup_logging(&config.logging, cli.log_level.as_deref());
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "loaded configuration"),
        ConfigSource::Defaults => warn!("no featmatrix.toml found, using built-in defaults"),
    }

    let result = match &cli.command {
        Commands::FeatureMatrix(args) => feature_matrix::run(&config, args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            report_error(&e);
            exit(exit_code_for(&e));
        }
    }
}

fn exit_code_for(e: &anyhow::Error) -> i32 {
    if e.chain().any(|cause| cause.is::<ConfigError>()) { EXIT_CONFIG_ERROR } else { EXIT_BUILD_FAILURE }
}

fn report_error(e: &anyhow::Error) {
    error!("{e}");
    for cause in e.chain().skip(1) {
        error!("  Caused by: {cause}");
    }
}

/// Logs go to stderr; stdout carries the progress lines.
fn setup_logging(config: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(&config.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = match config.format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Compact => subscriber.compact().try_init(),
        LogFormat::Pretty => subscriber.pretty().try_init(),
    };
}
