//! A single feature selection under test.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::flag::FEATURE_DELIMITER;

/// Whether a combination is the dedicated baseline smoke run or part of the
/// matrix proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationKind {
    Baseline,
    Matrix,
}

/// One concrete selection of feature flags.
///
/// Tokens are kept in first-appearance order in the catalog (baseline, then
/// independent flags, then group choices), so the joined feature argument is
/// deterministic. A bundled choice is one token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Combination {
    kind: CombinationKind,
    tokens: Vec<String>,
}

impl Combination {
    pub(crate) fn new(kind: CombinationKind, tokens: Vec<String>) -> Self {
        Self { kind, tokens }
    }

    pub fn kind(&self) -> CombinationKind {
        self.kind
    }

    pub fn is_baseline(&self) -> bool {
        self.kind == CombinationKind::Baseline
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Value for the build tool's feature selector, or `None` when nothing is
    /// selected.
    pub fn feature_arg(&self) -> Option<String> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.tokens.join(FEATURE_DELIMITER.to_string().as_str()))
        }
    }

    /// Individual flags selected, with bundles split into their components.
    pub fn flag_set(&self) -> BTreeSet<&str> {
        self.tokens.iter().flat_map(|t| t.split(FEATURE_DELIMITER)).collect()
    }
}

/// Honours width and alignment, so table columns can format it directly.
impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.feature_arg()) {
            (CombinationKind::Baseline, None) => f.pad("baseline (no optional features)"),
            (CombinationKind::Baseline, Some(arg)) => f.pad(&format!("baseline [{arg}]")),
            (CombinationKind::Matrix, None) => f.pad("[]"),
            (CombinationKind::Matrix, Some(arg)) => f.pad(&format!("[{arg}]")),
        }
    }
}

/// Split a joined feature argument back into its flags.
pub fn split_feature_arg(arg: &str) -> BTreeSet<&str> {
    arg.split(FEATURE_DELIMITER).filter(|f| !f.is_empty()).collect()
}
