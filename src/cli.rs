//! CLI module containing the main entry point logic.

use crate::config::Settings;
use crate::error::RunnerError;
use crate::lifecycle::Runner;
use clap::Parser as ClapParser;
use clap::error::ErrorKind;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI arguments for nipox.
#[derive(ClapParser, Debug)]
#[command(name = "nipox")]
#[command(version = PKG_VERSION)]
#[command(about = "Download a remote script and run it with the right interpreter", long_about = None)]
struct Cli {
    /// Script URL, `repo/path/to/file`, or a script name from the default
    /// repository, followed by the arguments passed through to the script.
    ///
    /// Everything after the script is forwarded unchanged, `--help` included.
    #[arg(value_name = "URL_OR_SCRIPT", trailing_var_arg = true)]
    command: Vec<String>,
}

impl Cli {
    /// The script identifier and the arguments that follow it.
    fn invocation(&self) -> Option<(&str, &[String])> {
        let (identifier, args) = self.command.split_first()?;
        Some((identifier.as_str(), args))
    }
}

/// Usage text shown when no script is given.
#[must_use]
pub fn usage(settings: &Settings) -> String {
    let org = &settings.org;
    let repo = &settings.default_repo;
    format!(
        "Usage: nipox <url|script-name> [args...]\n\
         \n\
         Examples:\n  \
         nipox https://example.com/script.sh arg1 arg2\n  \
         nipox my-script arg1 arg2  # downloads from {org}/{repo}\n  \
         nipox repo/my-script arg1 arg2  # downloads from {org}/repo\n\
         \n\
         Platform: {}",
        std::env::consts::OS
    )
}

/// Log to stderr so stdout belongs to the script. `NIPOX_LOG` wins over `RUST_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("NIPOX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Print an error and any suggested fixes to stderr.
pub fn report_error(error: &RunnerError) {
    eprintln!("Error: {error}");

    let hints = error.remediation();
    if !hints.is_empty() {
        eprintln!();
        eprintln!("Solutions:");
        for hint in hints {
            eprintln!("  - {hint}");
        }
    }
}

/// Main CLI logic: parse arguments, run the script, exit with its code.
pub fn run_cli() {
    init_logging();
    let settings = Settings::from_env();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            crate::fatal_error(&usage(&settings));
        }
    };

    let Some((identifier, args)) = cli.invocation() else {
        crate::fatal_error(&usage(&settings));
    };

    let code = match Runner::new(settings).run(identifier, args) {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            1
        }
    };

    std::process::exit(code);
}
