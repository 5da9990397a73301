//! Logging configuration for chatcmd.
//!
//! Logs go to stderr by default so they never mix with replies on stdout,
//! or to a file under the platform state directory.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initializes logging to a file.
///
/// Location: `~/.local/state/chatcmd/chatcmd.log` on Linux (XDG state directory),
/// or the platform-appropriate state/config directory on other systems.
pub fn init_file_logging(default_level: &str) {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            init_stderr_logging(default_level);
            return;
        }
    }

    // Truncate on each run
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            init_stderr_logging(default_level);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the path for the log file.
///
/// Uses XDG state directory on Linux (`~/.local/state/chatcmd/chatcmd.log`),
/// or falls back to config directory on other platforms.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("chatcmd").join("chatcmd.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("chatcmd").join("chatcmd.log");
    }

    std::env::temp_dir().join("chatcmd.log")
}
