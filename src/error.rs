//! Error taxonomy for a single invocation.

use crate::interpreter::OsFamily;
use std::path::PathBuf;

/// Every way an invocation can abort before the script produces an exit code.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Failed to download {url}: {status}")]
    Download { url: String, status: String },

    #[error("Failed to download {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to stage {}: {source}", .path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No compatible shell found. Please install {}.", .family.install_hint())]
    NoInterpreter { family: OsFamily },

    #[error("{label} execution not yet implemented. Please install Git Bash or WSL.")]
    Unimplemented { label: &'static str },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot determine the current directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

impl RunnerError {
    pub(crate) fn stage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Suggested fixes shown under the error message, if any.
    #[must_use]
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::NoInterpreter { family } => family.remediation(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_interpreter_has_remediation() {
        let err = RunnerError::NoInterpreter {
            family: OsFamily::Posix,
        };
        assert!(err.to_string().starts_with("No compatible shell found"));
        assert!(!err.remediation().is_empty());
    }

    #[test]
    fn test_other_errors_have_no_remediation() {
        let err = RunnerError::Download {
            url: "https://example.com/x.sh".to_string(),
            status: "404 Not Found".to_string(),
        };
        assert!(err.remediation().is_empty());
        assert_eq!(
            err.to_string(),
            "Failed to download https://example.com/x.sh: 404 Not Found"
        );
    }

    #[test]
    fn test_unimplemented_message_names_label() {
        let err = RunnerError::Unimplemented { label: "PowerShell" };
        assert!(err.to_string().contains("PowerShell execution not yet implemented"));
    }
}
