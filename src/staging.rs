//! Invocation-local temporary files and directories.
//!
//! Names follow `<prefix>-<epoch-ms><suffix>`. Creation is exclusive: if the
//! name is taken, the millisecond component is bumped until a free one is found.

use crate::error::RunnerError;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const SCRIPT_PREFIX: &str = "nipox";
pub const PROJECT_PREFIX: &str = "nipox-project";

const MAX_NAME_ATTEMPTS: u128 = 1000;

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

/// Find a free `<prefix>-<ms><suffix>` name in `dir` and create it with `create`.
fn reserve(
    dir: &Path,
    prefix: &str,
    suffix: &str,
    create: impl Fn(&Path) -> io::Result<()>,
) -> Result<PathBuf, RunnerError> {
    let start = epoch_millis();
    let mut last_path = dir.join(format!("{prefix}-{start}{suffix}"));

    for offset in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(format!("{prefix}-{}{suffix}", start + offset));
        match create(&path) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_path = path,
            Err(e) => return Err(RunnerError::stage(path, e)),
        }
    }

    Err(RunnerError::stage(
        last_path,
        io::Error::from(io::ErrorKind::AlreadyExists),
    ))
}

/// The downloaded script on disk. Removed exactly once, by [`StagedFile::remove`]
/// or, failing that, on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    removed: bool,
}

impl StagedFile {
    /// Create an empty, uniquely named file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no file can be created.
    pub fn create(dir: &Path, extension: &str) -> Result<Self, RunnerError> {
        let path = reserve(dir, SCRIPT_PREFIX, extension, |path| {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map(drop)
        })?;
        debug!("Staging script at {}", path.display());
        Ok(Self {
            path,
            removed: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mark the script executable (`0o755`). No-op outside Unix.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the permissions cannot be changed.
    pub fn make_executable(&self) -> Result<(), RunnerError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o755))
                .map_err(|e| RunnerError::stage(&self.path, e))?;
        }
        Ok(())
    }

    /// Delete the file. Failures are logged, never returned.
    pub fn remove(mut self) {
        self.remove_once();
    }

    fn remove_once(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Cleanup warning: {}: {e}", self.path.display()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.remove_once();
    }
}

/// Throwaway project directory, recursively removed on drop.
#[derive(Debug)]
pub struct ProjectDir {
    path: PathBuf,
}

impl ProjectDir {
    /// Create a uniquely named directory in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no directory can be created.
    pub fn create(dir: &Path) -> Result<Self, RunnerError> {
        let path = reserve(dir, PROJECT_PREFIX, "", |path| fs::create_dir(path))?;
        debug!("Created project directory {}", path.display());
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the project.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf, RunnerError> {
        let path = self.path.join(name);
        fs::write(&path, contents).map_err(|e| RunnerError::stage(&path, e))?;
        Ok(path)
    }
}

impl Drop for ProjectDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) => warn!("Cleanup warning: {}: {e}", self.path.display()),
        }
    }
}
