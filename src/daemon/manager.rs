// Daemon lifecycle: daemonize, claim the PID file, run the payload

use super::daemonize::daemonize_with;
use super::liveness::is_alive_with;
use super::pid::PidFile;
use super::sys::{NixProcess, ProcessControl};
use crate::error::Result;
use nix::unistd::Pid;
use std::path::PathBuf;
use tracing::debug;

/// Daemon manager for controlling daemon lifecycle
pub struct DaemonManager<S: ProcessControl = NixProcess> {
    pid_file: PidFile,
    sys: S,
}

impl DaemonManager {
    /// Create a new daemon manager with default PID file
    pub fn new() -> Self {
        Self::with_pid_file(PidFile::new())
    }

    /// Create a new daemon manager with custom PID file path
    pub fn with_pid_file(pid_file: PidFile) -> Self {
        Self {
            pid_file,
            sys: NixProcess,
        }
    }
}

impl<S: ProcessControl> DaemonManager<S> {
    /// Create a daemon manager driving a custom process-control layer
    pub fn with_process_control(pid_file: PidFile, sys: S) -> Self {
        Self { pid_file, sys }
    }

    pub fn pid_file(&self) -> &PidFile {
        &self.pid_file
    }

    /// Daemonize, reconcile the PID file and run `payload` in the daemon.
    ///
    /// Returns `Ok(None)` when daemonization failed. Ancestor processes exit
    /// inside this call, and so does the daemon if another instance is live.
    pub fn run<T, F: FnOnce() -> T>(&self, payload: F) -> Result<Option<T>> {
        if !daemonize_with(&self.sys) {
            return Ok(None);
        }

        let path = self.pid_file.reconcile_with(&self.sys)?;
        debug!(path = %path.display(), "PID file claimed");

        Ok(Some(payload()))
    }

    /// Get daemon status information. Never signals or modifies anything
    /// beyond the signal 0 probe.
    pub fn get_status(&self) -> DaemonStatus {
        let pid = self
            .pid_file
            .read()
            .ok()
            .and_then(|pid| is_alive_with(&self.sys, pid));

        DaemonStatus {
            running: pid.is_some(),
            pid,
            pid_file: self.pid_file.path().to_path_buf(),
        }
    }
}

impl Default for DaemonManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Daemon status information
#[derive(Debug, Clone)]
pub struct DaemonStatus {
    pub running: bool,
    pub pid: Option<Pid>,
    pub pid_file: PathBuf,
}
