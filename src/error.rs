//! Error types for chatcmd.
//!
//! Defines the main error enum used by the router and the console front end.

use thiserror::Error;

/// Error type returned by command handlers.
///
/// Handlers may fail with anything; the router hands the value back to its
/// caller untouched so it can be downcast to the concrete type.
pub type HandlerError = anyhow::Error;

/// Main error type for chatcmd operations.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Two descriptors were registered under the same name.
    #[error("Duplicate command name: {name}")]
    DuplicateCommandName { name: String },

    /// No top-level descriptor is registered under the requested name.
    #[error("Command not found: {name}")]
    CommandNotFound { name: String },

    /// Resolution reached a subcommand outside of its group.
    #[error("Ambiguous command: {name} is a subcommand and cannot be invoked directly")]
    AmbiguousCommand { name: String },

    /// The selected handler failed.
    #[error(transparent)]
    Handler(HandlerError),

    /// Configuration errors (unreadable or malformed config file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RouterError {
    /// Creates a duplicate name error for the given command name.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateCommandName { name: name.into() }
    }

    /// Creates a not-found error for the given command name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::CommandNotFound { name: name.into() }
    }

    /// Creates an ambiguity error for the given command name.
    pub fn ambiguous(name: impl Into<String>) -> Self {
        Self::AmbiguousCommand { name: name.into() }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DuplicateCommandName { .. } => "Registration Error",
            Self::CommandNotFound { .. } | Self::AmbiguousCommand { .. } => "Dispatch Error",
            Self::Handler(_) => "Handler Error",
            Self::Config(_) => "Configuration Error",
        }
    }

    /// Whether this error stems from what the user typed rather than a fault.
    ///
    /// Chat front ends usually stay silent on these.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::CommandNotFound { .. })
    }
}

/// Result type alias using RouterError.
pub type Result<T> = std::result::Result<T, RouterError>;
