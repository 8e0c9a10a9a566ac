//! Shell interpreter candidates and discovery
//!
//! Each OS family has a fixed, ordered list of interpreters. Discovery probes
//! them one at a time and picks the first that answers `--version` in time.

mod probe;

pub use probe::{ProbeFailure, probe};

use crate::error::RunnerError;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// A shell that may be able to run a staged script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub command: &'static str,
    /// Arguments placed before the script path
    pub args: &'static [&'static str],
    pub label: &'static str,
    /// Script extension this interpreter insists on, if any
    pub extension: Option<&'static str>,
    /// Arguments used for the liveness probe
    pub probe_args: &'static [&'static str],
}

impl Candidate {
    const fn new(command: &'static str, args: &'static [&'static str], label: &'static str) -> Self {
        Self {
            command,
            args,
            label,
            extension: None,
            probe_args: &["--version"],
        }
    }

    /// Whether this interpreter can execute a script staged with `extension`.
    #[must_use]
    pub fn accepts(&self, extension: &str) -> bool {
        self.extension.is_none_or(|required| required == extension)
    }
}

const POSIX_CANDIDATES: &[Candidate] = &[
    Candidate::new("bash", &[], "bash"),
    Candidate::new("sh", &[], "sh"),
];

const WINDOWS_CANDIDATES: &[Candidate] = &[
    Candidate::new("bash", &[], "Git Bash/WSL"),
    Candidate::new("wsl", &["bash"], "WSL bash"),
    Candidate {
        extension: Some(".ps1"),
        ..Candidate::new("powershell", &["-File"], "PowerShell")
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Posix,
    Windows,
}

impl OsFamily {
    #[must_use]
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    #[must_use]
    pub fn candidates(self) -> &'static [Candidate] {
        match self {
            Self::Posix => POSIX_CANDIDATES,
            Self::Windows => WINDOWS_CANDIDATES,
        }
    }

    pub(crate) fn install_hint(self) -> &'static str {
        match self {
            Self::Posix => "bash",
            Self::Windows => "bash, Git for Windows, or WSL",
        }
    }

    pub(crate) fn remediation(self) -> &'static [&'static str] {
        match self {
            Self::Posix => &[
                "Install bash: sudo apt install bash (Ubuntu/Debian)",
                "Install bash: brew install bash (macOS)",
            ],
            Self::Windows => &[
                "Install Git for Windows (includes Git Bash)",
                "Install Windows Subsystem for Linux (WSL)",
                "Use PowerShell (limited support)",
            ],
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "{}", std::env::consts::OS),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Ordered candidate list for one OS family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterTable {
    pub family: OsFamily,
    pub candidates: &'static [Candidate],
}

impl InterpreterTable {
    /// Table for the platform this binary was built for.
    #[must_use]
    pub fn current() -> Self {
        let family = OsFamily::current();
        Self {
            family,
            candidates: family.candidates(),
        }
    }

    /// Probe candidates in order and return the first live one.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::NoInterpreter`] if every probe fails or times out.
    pub fn discover(&self, timeout: Duration) -> Result<&'static Candidate, RunnerError> {
        for candidate in self.candidates {
            match probe(candidate, timeout) {
                Ok(()) => {
                    debug!("{} responded to probe", candidate.label);
                    return Ok(candidate);
                }
                Err(failure) => warn!("{} not available: {failure}", candidate.label),
            }
        }

        Err(RunnerError::NoInterpreter {
            family: self.family,
        })
    }
}
