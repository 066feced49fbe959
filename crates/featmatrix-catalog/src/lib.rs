//! Feature-flag catalog and combination matrix for featmatrix.
//!
//! A [`FlagCatalog`] describes what a run must test: baseline flags present
//! everywhere, independent flags toggled on and off, and alternative groups
//! of mutually exclusive choices. [`FlagCatalog::matrix`] enumerates the
//! combinations lazily, baseline smoke run first.
//!
//! ```
//! use featmatrix_catalog::{CatalogSpec, FlagCatalog, MatrixScope};
//!
//! let catalog = FlagCatalog::new(&CatalogSpec {
//!     baseline: vec![],
//!     independent: vec!["x".into()],
//!     groups: vec![vec!["a".into(), "b".into()]],
//! })?;
//!
//! let args: Vec<_> = catalog
//!     .matrix(MatrixScope::Full)
//!     .map(|c| c.feature_arg().unwrap_or_default())
//!     .collect();
//! assert_eq!(args, ["", "", "a", "b", "x", "x,a", "x,b"]);
//! # Ok::<(), featmatrix_catalog::CatalogError>(())
//! ```

mod catalog;
mod combination;
mod error;
mod flag;
mod matrix;

pub use catalog::{AlternativeGroup, CatalogSpec, FlagCatalog};
pub use combination::{Combination, CombinationKind, split_feature_arg};
pub use error::{CatalogError, Section};
pub use flag::{Choice, FEATURE_DELIMITER, Flag};
pub use matrix::{Matrix, MatrixScope};
