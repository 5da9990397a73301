//! Configuration management for chatcmd.
//!
//! Handles loading configuration from TOML files, with defaults for every
//! field so a missing file is not an error.

use crate::error::{Result, RouterError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for chatcmd.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Character a chat line must start with to be treated as a command.
    #[serde(default = "default_prefix")]
    pub prefix: char,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bot identity.
    #[serde(default)]
    pub bot: BotConfig,

    /// Feeding rules.
    #[serde(default)]
    pub feed: FeedConfig,
}

fn default_prefix() -> char {
    '!'
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            log_level: default_log_level(),
            bot: BotConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

/// Bot identity reported to handlers.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Channels the bot answers in. The first one is used by the console.
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// User holding owner rights. Ownership cannot be granted from chat.
    #[serde(default = "default_owner")]
    pub owner: String,
}

fn default_bot_name() -> String {
    "chatcmd".to_string()
}

fn default_channels() -> Vec<String> {
    vec!["general".to_string()]
}

fn default_owner() -> String {
    "console".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            channels: default_channels(),
            owner: default_owner(),
        }
    }
}

impl BotConfig {
    /// The channel console input is attributed to.
    pub fn primary_channel(&self) -> &str {
        self.channels.first().map(String::as_str).unwrap_or("general")
    }
}

/// Settings of the `feed` command group.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Seconds a user must wait between two feedings.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Treats on the menu at startup.
    #[serde(default = "default_treats")]
    pub treats: Vec<String>,
}

fn default_cooldown_secs() -> u64 {
    300
}

fn default_treats() -> Vec<String> {
    vec!["cookie".to_string(), "apple".to_string()]
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            treats: default_treats(),
        }
    }
}

impl FeedConfig {
    /// Cooldown as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Config {
    /// Returns the default config file path.
    ///
    /// `~/.config/chatcmd/config.toml` on Linux, or the platform config
    /// directory elsewhere.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chatcmd")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RouterError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            RouterError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
