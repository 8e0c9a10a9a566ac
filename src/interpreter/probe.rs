//! Bounded liveness probes

use super::Candidate;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

#[derive(Debug, thiserror::Error)]
pub enum ProbeFailure {
    #[error("{0}")]
    Spawn(#[source] std::io::Error),
    #[error("Exit code: {0}")]
    Exit(i32),
    #[error("Timeout after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Failed to wait for probe: {0}")]
    Wait(#[source] std::io::Error),
}

/// Kill and reap a probe that is no longer wanted. Errors are ignored since it may already be gone.
fn kill_probe(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Run `candidate` with its probe arguments and wait at most `timeout`.
///
/// A clean exit, or termination by a signal without an exit code, counts as alive.
///
/// # Errors
///
/// Returns the reason the candidate is considered unavailable.
pub fn probe(candidate: &Candidate, timeout: Duration) -> Result<(), ProbeFailure> {
    let mut child = Command::new(candidate.command)
        .args(candidate.probe_args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(ProbeFailure::Spawn)?;

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => match status.code() {
            Some(0) | None => Ok(()),
            Some(code) => Err(ProbeFailure::Exit(code)),
        },
        Ok(None) => {
            kill_probe(&mut child);
            Err(ProbeFailure::Timeout(timeout))
        }
        Err(e) => {
            kill_probe(&mut child);
            Err(ProbeFailure::Wait(e))
        }
    }
}
