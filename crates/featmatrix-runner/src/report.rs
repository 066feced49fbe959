//! Progress lines, per-combination records and the final verdict.

use std::io::{self, Write};
use std::time::Duration;

use featmatrix_catalog::{Combination, MatrixScope};
use serde::Serialize;

use crate::exit::{EXIT_BUILD_FAILURE, EXIT_LAUNCH_FAILURE, EXIT_SUCCESS, RESERVED_EXIT_CODES};
use crate::invocation::Invocation;

/// Exit status of one executed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub invocation: Invocation,
    pub exit_code: i32,
}

impl RunResult {
    pub fn status(&self) -> Status {
        if self.exit_code == 0 { Status::Passed } else { Status::Failed { exit_code: self.exit_code } }
    }
}

/// Outcome of one combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed { exit_code: i32 },
    LaunchFailed { message: String },
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinationRecord {
    /// One-based position in generation order.
    pub index: usize,
    pub combination: Combination,
    pub invocation: Invocation,
    #[serde(flatten)]
    pub status: Status,
    pub elapsed_ms: u64,
}

/// Everything a run attempted, in order. At most the last record failed.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scope: MatrixScope,
    pub dry_run: bool,
    pub total: usize,
    pub records: Vec<CombinationRecord>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.records.len()
    }

    pub fn passed(&self) -> usize {
        self.records.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn failure(&self) -> Option<&CombinationRecord> {
        self.records.iter().find(|r| !r.status.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.failure().is_none() && self.attempted() == self.total
    }

    /// Process exit status for this run.
    ///
    /// A failing build's own status is propagated when it fits a process
    /// exit code (1..=255) and is not one of the harness's reserved codes;
    /// anything else becomes [`EXIT_BUILD_FAILURE`].
    pub fn exit_code(&self) -> i32 {
        match self.failure().map(|r| &r.status) {
            None if self.is_success() => EXIT_SUCCESS,
            None => EXIT_BUILD_FAILURE,
            Some(Status::Failed { exit_code }) if is_propagated(*exit_code) => *exit_code,
            Some(Status::Failed { .. }) => EXIT_BUILD_FAILURE,
            Some(Status::LaunchFailed { .. }) => EXIT_LAUNCH_FAILURE,
            Some(Status::Passed) => EXIT_SUCCESS,
        }
    }
}

fn is_propagated(code: i32) -> bool {
    (1..=255).contains(&code) && !RESERVED_EXIT_CODES.contains(&code)
}

const RULE_WIDTH: usize = 64;

/// Writes progress to `out` (stdout in the binary) and collects records.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, scope: MatrixScope, total: usize, dry_run: bool) -> Self {
        Self { out, summary: RunSummary { scope, dry_run, total, records: Vec::new() } }
    }

    /// Progress line printed before a combination runs.
    pub fn begin(&mut self, index: usize, combination: &Combination) -> io::Result<()> {
        let total = self.summary.total;
        tracing::info!(index, total, combination = %combination, "testing combination");
        writeln!(self.out, "[{index}/{total}] testing {combination}")?;
        self.out.flush()
    }

    pub fn record(
        &mut self,
        index: usize,
        combination: Combination,
        invocation: Invocation,
        status: Status,
        elapsed: Duration,
    ) {
        match &status {
            Status::Passed => {
                tracing::info!(index, elapsed_ms = millis(elapsed), "combination passed");
            }
            Status::Failed { exit_code } => {
                tracing::error!(index, exit_code, combination = %combination, %invocation, "combination failed");
            }
            Status::LaunchFailed { message } => {
                tracing::error!(index, combination = %combination, "{message}");
            }
        }
        self.summary.records.push(CombinationRecord {
            index,
            combination,
            invocation,
            status,
            elapsed_ms: millis(elapsed),
        });
    }

    /// Results table and one-line verdict.
    pub fn finish(mut self) -> io::Result<RunSummary> {
        let summary = &self.summary;
        writeln!(self.out)?;
        writeln!(self.out, "Feature Matrix Results:")?;
        writeln!(self.out, "{}", "─".repeat(RULE_WIDTH))?;
        for record in &summary.records {
            let status = match &record.status {
                Status::Passed if summary.dry_run => "~ DRY-RUN".to_owned(),
                Status::Passed => "✓ PASS".to_owned(),
                Status::Failed { exit_code } => format!("✗ FAIL (exit {exit_code})"),
                Status::LaunchFailed { .. } => "✗ LAUNCH FAILED".to_owned(),
            };
            writeln!(self.out, "{:>5}  {:<44} {}", record.index, record.combination, status)?;
        }
        writeln!(self.out, "{}", "─".repeat(RULE_WIDTH))?;

        if let Some(failed) = summary.failure() {
            writeln!(
                self.out,
                "Feature matrix FAILED at {} of {}: {}",
                failed.index, summary.total, failed.combination
            )?;
            writeln!(self.out, "  command: {}", failed.invocation)?;
            if let Status::LaunchFailed { message } = &failed.status {
                writeln!(self.out, "  error: {message}")?;
            }
            let skipped = summary.total - summary.attempted();
            writeln!(self.out, "  {} passed, 1 failed, {skipped} not attempted", summary.passed())?;
        } else if summary.dry_run {
            writeln!(
                self.out,
                "Feature matrix: {} combinations would be checked (dry-run, none executed)",
                summary.total
            )?;
        } else {
            writeln!(self.out, "Feature matrix: all {} combinations passed", summary.passed())?;
        }
        self.out.flush()?;
        Ok(self.summary)
    }
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
