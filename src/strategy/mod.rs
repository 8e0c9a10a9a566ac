//! Execution strategies: one child process per invocation, stdio inherited.

pub mod node;
pub mod shell;
pub mod task;

use crate::error::RunnerError;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Resolve an executable through `PATH`, falling back to the bare name.
pub(crate) fn program(name: &str) -> PathBuf {
    which::which(name).unwrap_or_else(|_| PathBuf::from(name))
}

/// Exit code a shell would report for `status`: the code itself, `128 + signal`
/// for a signalled child on Unix, otherwise 1.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Run `cmd` to completion with the terminal attached.
pub(crate) fn run_attached(cmd: &mut Command, name: &str) -> Result<i32, RunnerError> {
    let status = cmd
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| RunnerError::spawn(name, e))?;
    Ok(exit_code(status))
}

/// Arguments of `cmd` as owned strings, for assertions and logging.
#[must_use]
pub fn command_args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}
