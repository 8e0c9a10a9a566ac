//! # nipox
//!
//! Download a shell script, Taskfile or JavaScript file and run it with the
//! right interpreter, cleaning up after itself.

pub mod cli;
pub mod config;
pub mod deps;
pub mod error;
pub mod fetch;
pub mod interpreter;
pub mod lifecycle;
pub mod source;
pub mod staging;
pub mod strategy;

pub use error::RunnerError;
pub use lifecycle::Runner;

/// Print an error message and exit with code 1.
pub fn fatal_error(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
