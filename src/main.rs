//! # nipox
//!
//! Run a remote script in one step, like `curl | sh` for shell scripts,
//! Taskfiles and JavaScript.
//!
//! ## Usage
//!
//! - Full URL: `nipox https://example.com/setup.sh arg1 arg2`
//! - Script from the default repository: `nipox hello.sh`
//! - Script from another repository: `nipox tools/release.yml build`

/// Entry point for the CLI tool.
fn main() {
    nipox::cli::run_cli();
}
