//! The fail-fast loop.

use std::io::Write;
use std::time::Instant;

use featmatrix_catalog::{FlagCatalog, MatrixScope};

use crate::error::RunError;
use crate::invocation::CommandTemplate;
use crate::report::{Reporter, RunResult, RunSummary, Status};
use crate::runner::Runner;

/// Run every combination of `catalog` in generation order, stopping at the
/// first one whose build exits non-zero or cannot be launched.
///
/// Combinations after a failure are never built. Only a failure to write
/// progress output is returned as `Err`; build and launch failures are
/// recorded in the summary, whose [`RunSummary::exit_code`] is the verdict.
pub fn run_matrix<R, W>(
    catalog: &FlagCatalog,
    command: &CommandTemplate,
    scope: MatrixScope,
    runner: &mut R,
    reporter: Reporter<W>,
) -> Result<RunSummary, RunError>
where
    R: Runner + ?Sized,
    W: Write,
{
    let mut reporter = reporter;

    for (position, combination) in catalog.matrix(scope).enumerate() {
        let index = position + 1;
        reporter.begin(index, &combination)?;

        let invocation = command.build(&combination);
        tracing::debug!(index, %invocation, "built invocation");

        let started = Instant::now();
        let status = match runner.run(&invocation) {
            Ok(exit_code) => RunResult { invocation: invocation.clone(), exit_code }.status(),
            Err(err @ RunError::Launch { .. }) => Status::LaunchFailed { message: err.to_string() },
            Err(err) => return Err(err),
        };
        let failed = !status.is_success();
        reporter.record(index, combination, invocation, status, started.elapsed());

        if failed {
            break;
        }
    }

    Ok(reporter.finish()?)
}

/// Print the plan: one line per combination with the argv it would run.
pub fn write_plan<W: Write>(
    catalog: &FlagCatalog,
    command: &CommandTemplate,
    scope: MatrixScope,
    mut out: W,
) -> Result<(), RunError> {
    let total = catalog.combination_count(scope);
    for (position, combination) in catalog.matrix(scope).enumerate() {
        writeln!(out, "{:>5}  {:<44} {}", position + 1, combination, command.build(&combination))?;
    }
    writeln!(out, "{total} combinations ({scope:?} scope)")?;
    out.flush()?;
    Ok(())
}
