//! Invocation building, process execution and fail-fast reporting.
//!
//! [`run_matrix`] walks a [`FlagCatalog`](featmatrix_catalog::FlagCatalog)'s
//! combinations in order, builds one [`Invocation`] each from a
//! [`CommandTemplate`], hands it to a [`Runner`] and stops at the first
//! non-zero exit. Execution is strictly sequential.

mod error;
pub mod exit;
mod invocation;
mod orchestrate;
mod report;
mod runner;

pub use error::RunError;
pub use invocation::{CommandTemplate, Invocation};
pub use orchestrate::{run_matrix, write_plan};
pub use report::{CombinationRecord, Reporter, RunResult, RunSummary, Status};
pub use runner::{DryRunRunner, ProcessRunner, Runner, exit_code};
