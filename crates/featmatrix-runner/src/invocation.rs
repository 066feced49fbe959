//! Turning a combination into a concrete command line.

use std::fmt;

use featmatrix_catalog::{Combination, CombinationKind};
use serde::{Deserialize, Serialize};

/// Base command the matrix is run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandTemplate {
    /// Executable to launch.
    pub program: String,
    /// Arguments passed on every invocation.
    pub args: Vec<String>,
    /// Extra arguments for matrix runs only (not the baseline smoke run),
    /// e.g. `--no-default-features` so the tool's defaults do not leak in.
    pub isolate_args: Vec<String>,
    /// Feature-selector option; its value is the comma-joined flag list.
    pub feature_flag: String,
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self {
            program: "cargo".to_owned(),
            args: vec!["check".to_owned()],
            isolate_args: vec!["--no-default-features".to_owned()],
            feature_flag: "--features".to_owned(),
        }
    }
}

impl CommandTemplate {
    /// The base command with nothing appended.
    pub fn base(&self) -> Invocation {
        Invocation { program: self.program.clone(), args: self.args.clone() }
    }

    /// Build the invocation for one combination.
    ///
    /// The feature list is passed as its own argv token, never through a
    /// shell, so bundled choices need no quoting.
    pub fn build(&self, combination: &Combination) -> Invocation {
        let mut invocation = self.base();
        if combination.kind() == CombinationKind::Matrix {
            invocation.args.extend(self.isolate_args.iter().cloned());
        }
        if let Some(features) = combination.feature_arg() {
            invocation.args.push(self.feature_flag.clone());
            invocation.args.push(features);
        }
        invocation
    }
}

/// A program and its argv, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
