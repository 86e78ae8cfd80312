// CLI module - launch the daemon or inspect its PID file

use crate::daemon::{DaemonManager, PidFile, DEFAULT_PID_FILE};
use crate::error::Result;
use crate::logging::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Message printed by the daemon once it owns the PID file
pub const GREETING: &str = "Hello from FORK!";

/// pidw - run a single-instance daemon guarded by a PID file
#[derive(Parser, Debug)]
#[command(name = "pidw")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of the PID file
    #[arg(short, long, default_value = DEFAULT_PID_FILE, global = true)]
    pid_file: PathBuf,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Daemonize and claim the PID file (default)
    Run,
    /// Report whether the recorded instance is alive
    Status,
}

impl Cli {
    /// Run the CLI application
    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        init_logging(&cli.log_level);
        cli.execute()
    }

    /// Execute the parsed command
    fn execute(&self) -> Result<()> {
        let manager = DaemonManager::with_pid_file(PidFile::with_path(&self.pid_file));

        match self.command.as_ref().unwrap_or(&Commands::Run) {
            Commands::Run => {
                // Failure to daemonize is silent; only the daemon greets
                manager.run(|| println!("{}", GREETING))?;
                Ok(())
            }
            Commands::Status => {
                let status = manager.get_status();
                match status.pid {
                    Some(pid) => println!("running (PID: {})", pid),
                    None => println!("not running"),
                }
                Ok(())
            }
        }
    }
}
