// Process-control primitives used by the daemonizer and the PID reconciler

use nix::sys::signal::{kill, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{ForkResult, Pid};

/// Every process-wide side effect the daemon performs goes through this trait.
pub trait ProcessControl {
    /// Duplicate the calling process.
    fn fork(&self) -> nix::Result<ForkResult>;

    /// Become the leader of a new session, dropping the controlling terminal.
    fn setsid(&self) -> nix::Result<Pid>;

    /// Set the file-creation mask, returning the previous one.
    fn umask(&self, mask: Mode) -> Mode;

    /// PID of the calling process.
    fn getpid(&self) -> Pid;

    /// Deliver signal 0 to `pid`. Nothing is sent; only existence and
    /// permission are checked.
    fn probe(&self, pid: Pid) -> nix::Result<()>;

    /// Send SIGKILL to the calling process.
    fn kill_self(&self) -> !;

    /// Terminate the calling process with `code`.
    fn exit(&self, code: i32) -> !;
}

/// The real operating system, via `nix`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixProcess;

impl ProcessControl for NixProcess {
    fn fork(&self) -> nix::Result<ForkResult> {
        // Safe as long as the process is single-threaded at this point
        unsafe { nix::unistd::fork() }
    }

    fn setsid(&self) -> nix::Result<Pid> {
        nix::unistd::setsid()
    }

    fn umask(&self, mask: Mode) -> Mode {
        nix::sys::stat::umask(mask)
    }

    fn getpid(&self) -> Pid {
        nix::unistd::getpid()
    }

    fn probe(&self, pid: Pid) -> nix::Result<()> {
        kill(pid, None)
    }

    fn kill_self(&self) -> ! {
        let _ = kill(nix::unistd::getpid(), Signal::SIGKILL);
        // SIGKILL cannot be caught; only reached if the kill itself failed
        std::process::abort()
    }

    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use nix::errno::Errno;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Fork,
        Setsid,
        Umask(Mode),
        Probe(Pid),
    }

    /// Scripted stand-in for the OS. `exit` and `kill_self` panic with a
    /// recognisable message so tests can observe the non-returning branches.
    pub struct FakeProcess {
        pub pid: Pid,
        pub alive: Vec<Pid>,
        pub forks: RefCell<VecDeque<nix::Result<ForkResult>>>,
        pub setsid_result: nix::Result<Pid>,
        pub calls: RefCell<Vec<Call>>,
    }

    impl FakeProcess {
        pub fn new(pid: i32) -> Self {
            let pid = Pid::from_raw(pid);
            Self {
                pid,
                alive: vec![pid],
                forks: RefCell::new(VecDeque::new()),
                setsid_result: Ok(pid),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn with_forks(self, forks: Vec<nix::Result<ForkResult>>) -> Self {
            *self.forks.borrow_mut() = forks.into();
            self
        }

        pub fn with_alive(mut self, pids: &[i32]) -> Self {
            self.alive.extend(pids.iter().copied().map(Pid::from_raw));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl ProcessControl for FakeProcess {
        fn fork(&self) -> nix::Result<ForkResult> {
            self.calls.borrow_mut().push(Call::Fork);
            self.forks
                .borrow_mut()
                .pop_front()
                .expect("unscripted fork")
        }

        fn setsid(&self) -> nix::Result<Pid> {
            self.calls.borrow_mut().push(Call::Setsid);
            self.setsid_result
        }

        fn umask(&self, mask: Mode) -> Mode {
            self.calls.borrow_mut().push(Call::Umask(mask));
            Mode::from_bits_truncate(0o022)
        }

        fn getpid(&self) -> Pid {
            self.pid
        }

        fn probe(&self, pid: Pid) -> nix::Result<()> {
            self.calls.borrow_mut().push(Call::Probe(pid));
            if self.alive.contains(&pid) {
                Ok(())
            } else {
                Err(Errno::ESRCH)
            }
        }

        fn kill_self(&self) -> ! {
            panic!("SIGKILL {}", self.pid)
        }

        fn exit(&self, code: i32) -> ! {
            panic!("exit({})", code)
        }
    }
}
