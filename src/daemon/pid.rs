// PID file management and single-instance reconciliation

use super::liveness::is_alive_with;
use super::sys::{NixProcess, ProcessControl};
use crate::error::{PidwError, Result};
use nix::unistd::Pid;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default PID file location, relative to the working directory
pub const DEFAULT_PID_FILE: &str = ".pidw";

/// Manages the daemon PID file
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Create a new PID file manager with default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PID_FILE),
        }
    }

    /// Create a new PID file manager with custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path to the PID file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the PID file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the PID from the file
    pub fn read(&self) -> Result<Pid> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            PidwError::PidFileError(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        parse_pid(&content)
    }

    /// Write the current process PID to the file
    pub fn write(&self) -> Result<()> {
        self.write_with(&NixProcess)
    }

    fn write_with<S: ProcessControl>(&self, sys: &S) -> Result<()> {
        let pid = sys.getpid();
        fs::write(&self.path, pid.to_string()).map_err(|e| {
            PidwError::PidFileError(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })?;
        info!(%pid, path = %self.path.display(), "Wrote PID file");
        Ok(())
    }

    /// Remove the PID file. A file that is already gone is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PidwError::PidFileError(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Best-effort removal; the outcome is deliberately ignored.
    fn discard(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), "Discarding PID file failed: {}", e);
        }
    }

    /// Enforce the single-instance rule and record the current process.
    ///
    /// If the file names a live process, the current process kills itself
    /// with SIGKILL and this call never returns. That includes the case where
    /// the recorded PID is the caller's own. Stale or unreadable files are
    /// removed before the current PID is written.
    pub fn reconcile(&self) -> Result<PathBuf> {
        self.reconcile_with(&NixProcess)
    }

    /// [`PidFile::reconcile`] against an arbitrary process-control layer.
    pub fn reconcile_with<S: ProcessControl>(&self, sys: &S) -> Result<PathBuf> {
        if self.exists() {
            if let Err(e) = self.clear_stale(sys) {
                debug!(path = %self.path.display(), "Unusable PID file: {}", e);
                self.discard();
            }
        }

        self.write_with(sys)?;
        Ok(self.path.clone())
    }

    fn clear_stale<S: ProcessControl>(&self, sys: &S) -> Result<()> {
        let pid = self.read()?;

        if is_alive_with(sys, pid).is_some() {
            debug!(%pid, "Another instance is running");
            sys.kill_self();
        }

        info!(%pid, path = %self.path.display(), "Removing stale PID file");
        fs::remove_file(&self.path)?;
        Ok(())
    }
}

impl Default for PidFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconcile the PID file at `path`, see [`PidFile::reconcile`].
pub fn write_pid<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    PidFile::with_path(path).reconcile()
}

/// Parse PID file content. Only strictly positive values name a single
/// process; zero and negatives address process groups under kill(2).
pub fn parse_pid(content: &str) -> Result<Pid> {
    let raw = content.trim();
    let pid = raw
        .parse::<i32>()
        .map_err(|e| PidwError::InvalidPid(format!("{:?}: {}", raw, e)))?;

    if pid <= 0 {
        return Err(PidwError::InvalidPid(format!(
            "{} does not name a single process",
            pid
        )));
    }

    Ok(Pid::from_raw(pid))
}
