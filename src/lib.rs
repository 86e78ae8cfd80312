// Library exports for pidw, a single-instance daemon launcher

#[cfg(not(unix))]
compile_error!("pidw relies on POSIX fork/setsid semantics and only builds on Unix");

pub mod cli;
pub mod daemon;
pub mod error;
pub mod logging;
