//! One invocation, from identifier to exit code.
//!
//! The invocation is driven through an explicit state machine:
//!
//! ```text
//! Resolving -> Downloading -> Staged -> Executing -> Cleaning -> Done
//!                   |                        |           ^
//!                   +------------------------+-----------+  (on error)
//! ```
//!
//! Once the staged file exists every path runs through `Cleaning`, which is
//! the only place the file is removed.

use crate::config::Settings;
use crate::error::RunnerError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::interpreter::InterpreterTable;
use crate::source::{self, ScriptFormat};
use crate::staging::StagedFile;
use crate::strategy;
use tracing::{debug, info};

/// Observable position of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Downloading,
    Staged,
    Executing,
    Cleaning,
    Done,
}

enum State {
    Resolving,
    Downloading {
        url: String,
        format: ScriptFormat,
    },
    Staged {
        format: ScriptFormat,
        file: StagedFile,
    },
    Executing {
        format: ScriptFormat,
        file: StagedFile,
    },
    Cleaning {
        file: StagedFile,
        outcome: Result<i32, RunnerError>,
    },
    Done(Result<i32, RunnerError>),
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            Self::Resolving => Stage::Resolving,
            Self::Downloading { .. } => Stage::Downloading,
            Self::Staged { .. } => Stage::Staged,
            Self::Executing { .. } => Stage::Executing,
            Self::Cleaning { .. } => Stage::Cleaning,
            Self::Done(_) => Stage::Done,
        }
    }
}

/// Downloads and runs scripts.
pub struct Runner<F = HttpFetcher> {
    settings: Settings,
    fetcher: F,
    interpreters: InterpreterTable,
}

impl Runner<HttpFetcher> {
    /// Runner that downloads over HTTP and uses this platform's shells.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_fetcher(settings, HttpFetcher)
    }
}

impl<F: Fetch> Runner<F> {
    #[must_use]
    pub fn with_fetcher(settings: Settings, fetcher: F) -> Self {
        Self {
            settings,
            fetcher,
            interpreters: InterpreterTable::current(),
        }
    }

    /// Replace the shell candidate table.
    #[must_use]
    pub fn with_interpreters(mut self, interpreters: InterpreterTable) -> Self {
        self.interpreters = interpreters;
        self
    }

    /// Fetch `identifier`, run it with `args`, and return the child's exit code.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the download, interpreter discovery, or child spawn fails.
    /// The staged file is gone by the time this returns, in every case.
    pub fn run(&self, identifier: &str, args: &[String]) -> Result<i32, RunnerError> {
        self.run_observed(identifier, args, |_| {})
    }

    /// [`Runner::run`], reporting each stage entered to `observe`.
    ///
    /// # Errors
    ///
    /// Same as [`Runner::run`].
    pub fn run_observed(
        &self,
        identifier: &str,
        args: &[String],
        mut observe: impl FnMut(Stage),
    ) -> Result<i32, RunnerError> {
        let mut state = State::Resolving;
        loop {
            observe(state.stage());
            debug!("Entering {:?}", state.stage());

            state = match state {
                State::Resolving => {
                    let url = source::resolve(identifier, &self.settings);
                    let format = ScriptFormat::classify(&url);
                    State::Downloading { url, format }
                }
                State::Downloading { url, format } => self.download(&url, format),
                State::Staged { format, file } => {
                    match format {
                        ScriptFormat::Task => {
                            info!("Detected YAML file. Executing with Taskfile...");
                        }
                        ScriptFormat::JavaScript => {
                            info!("Detected JavaScript file. Executing with dependencies...");
                        }
                        ScriptFormat::Shell => {
                            info!("Executing: {identifier} {}", args.join(" "));
                        }
                    }
                    State::Executing { format, file }
                }
                State::Executing { format, file } => {
                    let outcome = self.execute(format, &file, args);
                    State::Cleaning { file, outcome }
                }
                State::Cleaning { file, outcome } => {
                    file.remove();
                    State::Done(outcome)
                }
                State::Done(outcome) => return outcome,
            };
        }
    }

    fn download(&self, url: &str, format: ScriptFormat) -> State {
        info!("Platform: {}", self.interpreters.family);
        info!("Downloading: {url}");

        let file = match StagedFile::create(&self.settings.temp_dir, format.extension()) {
            Ok(file) => file,
            Err(e) => return State::Done(Err(e)),
        };

        let staged = self
            .fetcher
            .fetch(url, file.path())
            .and_then(|()| file.make_executable());

        match staged {
            Ok(()) => State::Staged { format, file },
            Err(e) => State::Cleaning {
                file,
                outcome: Err(e),
            },
        }
    }

    fn execute(
        &self,
        format: ScriptFormat,
        file: &StagedFile,
        args: &[String],
    ) -> Result<i32, RunnerError> {
        match format {
            ScriptFormat::Shell => strategy::shell::run(
                file.path(),
                args,
                &self.interpreters,
                self.settings.probe_timeout,
            ),
            ScriptFormat::Task => {
                let cwd = std::env::current_dir().map_err(RunnerError::WorkingDir)?;
                strategy::task::run(file.path(), args, &cwd)
            }
            ScriptFormat::JavaScript => {
                let cwd = std::env::current_dir().map_err(RunnerError::WorkingDir)?;
                strategy::node::run(file.path(), args, &cwd, &self.settings.temp_dir)
            }
        }
    }
}
