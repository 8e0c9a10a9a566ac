//! Shell scripts run under the first interpreter that passes discovery.

use super::run_attached;
use crate::error::RunnerError;
use crate::interpreter::{Candidate, InterpreterTable};
use crate::source::ScriptFormat;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::info;

/// `<command> <candidate args> <script> <args...>`
#[must_use]
pub fn shell_command(candidate: &Candidate, script: &Path, args: &[String]) -> Command {
    let mut cmd = Command::new(candidate.command);
    cmd.args(candidate.args).arg(script).args(args);
    cmd
}

/// Discover a shell and run `script` with it.
///
/// # Errors
///
/// Returns `Err` if no shell is live, the chosen shell cannot run `.sh`
/// scripts, or the shell fails to start.
pub fn run(
    script: &Path,
    args: &[String],
    table: &InterpreterTable,
    probe_timeout: Duration,
) -> Result<i32, RunnerError> {
    info!("Finding compatible shell...");
    let candidate = table.discover(probe_timeout)?;
    info!("Using: {}", candidate.label);

    if !candidate.accepts(ScriptFormat::Shell.extension()) {
        return Err(RunnerError::Unimplemented {
            label: candidate.label,
        });
    }

    run_attached(
        &mut shell_command(candidate, script, args),
        candidate.command,
    )
}
