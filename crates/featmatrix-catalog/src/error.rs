//! Catalog configuration errors.

use std::fmt;

use thiserror::Error;

/// Where a flag was declared inside a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Baseline,
    Independent,
    /// Alternative group, by zero-based position in the catalog.
    Group(usize),
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::Independent => f.write_str("independent"),
            Self::Group(index) => write!(f, "group #{index}"),
        }
    }
}

/// Errors produced while building a [`FlagCatalog`](crate::FlagCatalog).
///
/// Every variant is a configuration defect: it is detected before any build
/// invocation runs and there is no recovery path.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("empty flag name in {section}")]
    EmptyFlag { section: Section },

    #[error(
        "flag `{flag}` in {section} contains the feature delimiter `,`; \
         only alternative-group choices may bundle flags"
    )]
    DelimiterInFlag { flag: String, section: Section },

    #[error("flag `{flag}` is declared in both {first} and {second}")]
    DuplicateFlag { flag: String, first: Section, second: Section },

    #[error("{section} lists the choice `{choice}` more than once")]
    DuplicateChoice { choice: String, section: Section },

    #[error("feature matrix is too large to enumerate ({independent} independent flags, {groups} groups)")]
    MatrixTooLarge { independent: usize, groups: usize },
}
