// Daemon module - Background process and PID file management

pub mod daemonize;
pub mod liveness;
pub mod manager;
pub mod pid;
pub mod sys;

pub use daemonize::{daemonize, daemonize_with};
pub use liveness::{is_alive, is_alive_with};
pub use manager::{DaemonManager, DaemonStatus};
pub use pid::{write_pid, PidFile, DEFAULT_PID_FILE};
pub use sys::{NixProcess, ProcessControl};
