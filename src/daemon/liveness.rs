// Liveness probe built on signal 0

use super::sys::{NixProcess, ProcessControl};
use nix::unistd::Pid;
use tracing::trace;

/// Check whether `pid` refers to a live process by sending it signal 0.
///
/// Returns the PID back when delivery succeeds. A process that exists but
/// may not be signalled by the caller is reported as absent.
pub fn is_alive(pid: Pid) -> Option<Pid> {
    is_alive_with(&NixProcess, pid)
}

/// [`is_alive`] against an arbitrary process-control layer.
pub fn is_alive_with<S: ProcessControl>(sys: &S, pid: Pid) -> Option<Pid> {
    match sys.probe(pid) {
        Ok(()) => Some(pid),
        Err(errno) => {
            trace!(%pid, %errno, "Liveness probe failed");
            None
        }
    }
}
