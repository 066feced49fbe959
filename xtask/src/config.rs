//! `featmatrix.toml` loading.
//!
//! Resolution order for the file: `--config`, then `FEATMATRIX_CONFIG`, then
//! `featmatrix.toml` in the working directory. Only the last may be absent,
//! in which case built-in defaults apply.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use featmatrix_catalog::{CatalogError, CatalogSpec};
use featmatrix_runner::CommandTemplate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "featmatrix.toml";
pub const CONFIG_ENV: &str = "FEATMATRIX_CONFIG";

/// Whole harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub command: CommandTemplate,
    pub catalog: CatalogSpec,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

/// Configuration defects; all map to the configuration exit code.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid feature catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl HarnessConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text, path)
    }

    /// Load using the resolution order described in the module docs.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

        if let Some(path) = named {
            let config = Self::from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            let config = Self::from_file(&default_path)?;
            return Ok((config, ConfigSource::File(default_path)));
        }
        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Command template with the build tool located.
    ///
    /// A `cargo` program is replaced by `$CARGO` when set, so `cargo xtask`
    /// checks with the same toolchain that launched it.
    pub fn resolved_command(&self) -> CommandTemplate {
        let mut command = self.command.clone();
        if command.program == "cargo" {
            if let Some(cargo) = env::var_os("CARGO").filter(|v| !v.is_empty()) {
                command.program = cargo.to_string_lossy().into_owned();
            }
        }
        command
    }
}
