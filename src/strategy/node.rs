//! JavaScript scripts with declared npm dependencies.
//!
//! The script is copied into a throwaway npm project together with a generated
//! `package.json`. Dependencies are installed with `npm install`, then the
//! script runs under `node` from inside that project. The project directory is
//! removed once the child exits, whatever the outcome.

use super::{program, run_attached};
use crate::deps::{self, Manifest, ModuleType};
use crate::error::RunnerError;
use crate::staging::ProjectDir;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::info;

pub const MANIFEST_FILE: &str = "package.json";
pub const SCRIPT_FILE: &str = "script.js";

/// A populated project, ready to install and run.
#[derive(Debug)]
pub struct StagedProject {
    dir: ProjectDir,
    pub dependencies: Vec<String>,
    pub module_type: ModuleType,
}

impl StagedProject {
    /// Build the project in a fresh directory under `temp_dir` from `source`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the directory or its files cannot be written. The
    /// directory is removed in that case too.
    pub fn create(temp_dir: &Path, source: &str) -> Result<Self, RunnerError> {
        let module_type = ModuleType::detect(source);
        let dependencies = deps::extract_dependencies(source);

        let dir = ProjectDir::create(temp_dir)?;
        let manifest = Manifest::new(&dependencies, module_type)
            .to_json()
            .map_err(|e| RunnerError::stage(dir.path().join(MANIFEST_FILE), e.into()))?;
        dir.write(MANIFEST_FILE, &manifest)?;
        dir.write(SCRIPT_FILE, &deps::with_preamble(source))?;

        Ok(Self {
            dir,
            dependencies,
            module_type,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `npm install`, run inside the project. npm's chatter goes to stderr.
    #[must_use]
    pub fn install_command(&self) -> Command {
        let mut cmd = Command::new(program("npm"));
        cmd.arg("install")
            .current_dir(self.path())
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .stderr(Stdio::inherit());
        cmd
    }

    /// `node script.js --workdir <cwd> <args...>`, run inside the project.
    #[must_use]
    pub fn run_command(&self, args: &[String], cwd: &Path) -> Command {
        let mut cmd = Command::new(program("node"));
        cmd.arg(SCRIPT_FILE)
            .arg("--workdir")
            .arg(cwd)
            .args(args)
            .current_dir(self.path());
        cmd
    }

    /// Install dependencies, then run the script. A failed install is reported
    /// as its exit code and the script is not started.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `npm` or `node` cannot be started.
    pub fn install_and_run(&self, args: &[String], cwd: &Path) -> Result<i32, RunnerError> {
        let status = self
            .install_command()
            .status()
            .map_err(|e| RunnerError::spawn("npm", e))?;
        let install_code = super::exit_code(status);
        if install_code != 0 {
            return Ok(install_code);
        }

        run_attached(&mut self.run_command(args, cwd), "node")
    }
}

/// Stage `script` as an npm project, run it, and clean the project up.
///
/// # Errors
///
/// Returns `Err` if the script cannot be read, the project cannot be staged,
/// or `npm`/`node` cannot be started.
pub fn run(script: &Path, args: &[String], cwd: &Path, temp_dir: &Path) -> Result<i32, RunnerError> {
    let source = fs::read_to_string(script).map_err(|e| RunnerError::stage(script, e))?;
    let project = StagedProject::create(temp_dir, &source)?;

    let esm = if project.module_type == ModuleType::Module {
        " (ES6)"
    } else {
        ""
    };
    let listed = if project.dependencies.is_empty() {
        "none".to_string()
    } else {
        project.dependencies.join(", ")
    };
    info!("Executing JavaScript{esm} with dependencies: {listed}");

    let result = project.install_and_run(args, cwd);
    drop(project);
    result
}
