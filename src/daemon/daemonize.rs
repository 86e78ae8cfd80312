// Double-fork daemonization for Unix systems

use super::sys::{NixProcess, ProcessControl};
use crate::error::{PidwError, Result};
use nix::sys::stat::Mode;
use nix::unistd::ForkResult;
use tracing::debug;

/// Detach the calling process from its terminal.
///
/// Returns `true` only in the final grandchild. Both ancestors exit with
/// status 0; a failed fork or session change returns `false` and the caller
/// must not behave as the daemon.
pub fn daemonize() -> bool {
    daemonize_with(&NixProcess)
}

/// [`daemonize`] against an arbitrary process-control layer.
pub fn daemonize_with<S: ProcessControl>(sys: &S) -> bool {
    match detach(sys) {
        Ok(()) => true,
        Err(e) => {
            debug!("Daemonization aborted: {}", e);
            false
        }
    }
}

fn detach<S: ProcessControl>(sys: &S) -> Result<()> {
    // First fork
    fork_and_exit_parent(sys, "first")?;

    // Create new session and become session leader
    sys.setsid()
        .map_err(|e| PidwError::SessionError(e.to_string()))?;
    sys.umask(Mode::empty());

    // Second fork so the daemon is never a session leader and cannot
    // reacquire a controlling terminal
    fork_and_exit_parent(sys, "second")?;

    debug!(pid = %sys.getpid(), "Daemonized");
    Ok(())
}

fn fork_and_exit_parent<S: ProcessControl>(sys: &S, which: &str) -> Result<()> {
    match sys.fork() {
        Ok(ForkResult::Parent { .. }) => sys.exit(0),
        Ok(ForkResult::Child) => Ok(()),
        Err(e) => Err(PidwError::ForkError(format!("{} fork: {}", which, e))),
    }
}
