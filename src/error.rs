use thiserror::Error;

/// Main error type for pidw
#[derive(Debug, Error)]
pub enum PidwError {
    // Daemonization errors
    #[error("Fork failed: {0}")]
    ForkError(String),

    #[error("Failed to create new session: {0}")]
    SessionError(String),

    // PID file errors
    #[error("Invalid PID: {0}")]
    InvalidPid(String),

    #[error("PID file error: {0}")]
    PidFileError(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pidw operations
pub type Result<T> = std::result::Result<T, PidwError>;
