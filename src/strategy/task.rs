//! Taskfile YAML handed to the go-task runner via `npx`.

use super::{program, run_attached};
use crate::error::RunnerError;
use std::path::Path;
use std::process::Command;

pub const TASK_RUNNER_PACKAGE: &str = "@go-task/cli";

/// `npx @go-task/cli --dir <cwd> --taskfile <taskfile> <args...>`
#[must_use]
pub fn task_command(taskfile: &Path, args: &[String], cwd: &Path) -> Command {
    let mut cmd = Command::new(program("npx"));
    cmd.arg(TASK_RUNNER_PACKAGE)
        .arg("--dir")
        .arg(cwd)
        .arg("--taskfile")
        .arg(taskfile)
        .args(args);
    cmd
}

/// Run the task runner against `taskfile` in `cwd`.
///
/// # Errors
///
/// Returns `Err` if `npx` cannot be started.
pub fn run(taskfile: &Path, args: &[String], cwd: &Path) -> Result<i32, RunnerError> {
    run_attached(&mut task_command(taskfile, args, cwd), "npx")
}
