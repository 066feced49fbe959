//! Executing invocations.

use std::io::Write;
use std::process::{Command, ExitStatus};

use crate::error::RunError;
use crate::invocation::Invocation;

/// Executes one invocation and reports its exit status.
///
/// Closures `FnMut(&Invocation) -> Result<i32, RunError>` are runners too,
/// which is how tests script build outcomes.
pub trait Runner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32, RunError>;
}

impl<F> Runner for F
where
    F: FnMut(&Invocation) -> Result<i32, RunError>,
{
    fn run(&mut self, invocation: &Invocation) -> Result<i32, RunError> {
        self(invocation)
    }
}

/// Spawns the invocation as a child process and waits for it.
///
/// The child inherits the environment, working directory, stdout and stderr,
/// so its output lands in the CI log in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<i32, RunError> {
        tracing::debug!(program = %invocation.program, args = ?invocation.args, "spawning build");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|source| RunError::Launch { program: invocation.program.clone(), source })?;
        Ok(exit_code(status))
    }
}

/// Prints each invocation instead of running it; every run passes.
#[derive(Debug)]
pub struct DryRunRunner<W> {
    out: W,
}

impl<W: Write> DryRunRunner<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Runner for DryRunRunner<W> {
    fn run(&mut self, invocation: &Invocation) -> Result<i32, RunError> {
        writeln!(self.out, "  [DRY-RUN] {invocation}")?;
        Ok(0)
    }
}

/// Integer status of a finished child. Signal deaths map to `128 + signal`
/// on Unix, and to 1 where no code is available.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            tracing::warn!(signal, "build terminated by signal");
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(program: &str, args: &[&str]) -> Invocation {
        Invocation { program: program.into(), args: args.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn dry_run_prints_and_passes() {
        let mut out = Vec::new();
        let code = DryRunRunner::new(&mut out)
            .run(&invocation("cargo", &["check", "--features", "x"]))
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "  [DRY-RUN] cargo check --features x\n");
    }

    #[test]
    fn closures_are_runners() {
        let mut calls = 0;
        let mut runner = |_: &Invocation| -> Result<i32, RunError> {
            calls += 1;
            Ok(7)
        };
        assert_eq!(runner.run(&invocation("x", &[])).unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let err = ProcessRunner
            .run(&invocation("featmatrix-definitely-not-a-real-program", &[]))
            .unwrap_err();
        assert!(matches!(err, RunError::Launch { ref program, .. } if program.starts_with("featmatrix-")));
    }

    #[cfg(unix)]
    #[test]
    fn child_exit_status_is_returned() {
        assert_eq!(ProcessRunner.run(&invocation("true", &[])).unwrap(), 0);
        assert_eq!(ProcessRunner.run(&invocation("false", &[])).unwrap(), 1);
        assert_eq!(ProcessRunner.run(&invocation("sh", &["-c", "exit 42"])).unwrap(), 42);
    }

    #[cfg(unix)]
    #[test]
    fn signal_death_is_non_zero() {
        let code = ProcessRunner.run(&invocation("sh", &["-c", "kill -9 $$"])).unwrap();
        assert_eq!(code, 128 + 9);
    }
}
