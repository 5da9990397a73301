//! Command-line argument parsing for chatcmd.

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// A two-level text command router for chat bots.
///
/// Reads chat lines from stdin (or `--exec`) and dispatches those starting
/// with the command prefix.
#[derive(Parser, Debug)]
#[command(name = "chatcmd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "CHATCMD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command prefix character (overrides config)
    #[arg(short = 'p', long, value_name = "CHAR")]
    pub prefix: Option<char>,

    /// Name of the user the console speaks as
    #[arg(short = 'u', long, value_name = "NAME", default_value = "console")]
    pub user: String,

    /// Write logs to the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,

    /// Run this chat line and exit (repeatable)
    #[arg(short = 'e', long = "exec", value_name = "LINE")]
    pub exec: Vec<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path, using default if not specified.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Resolves the effective prefix: CLI flag first, then config.
    pub fn effective_prefix(&self, config: &Config) -> char {
        self.prefix.unwrap_or(config.prefix)
    }
}
