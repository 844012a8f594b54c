//! Error types for Crank.
//!
//! Defines the main error enum used throughout the dispatch engine.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Shared error source so a single failure can travel through several hook contexts.
pub type SharedSource = Arc<dyn StdError + Send + Sync + 'static>;

/// Main error type for Crank operations.
#[derive(Error, Debug, Clone)]
pub enum CrankError {
    /// Registration-time configuration errors (duplicate name, bad alias, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Global options could not be parsed.
    #[error("Global options error: {0}")]
    GlobalOptions(String),

    /// The first argument looked like a command name but nothing is registered under it.
    #[error("unknown input command \"{name}\"")]
    UnknownCommand {
        name: String,
        suggestions: Vec<String>,
    },

    /// A command with sub-commands received an unknown sub-command name.
    #[error("unknown sub-command \"{name}\" for command \"{parent}\"")]
    UnknownSubcommand {
        parent: String,
        name: String,
        suggestions: Vec<String>,
    },

    /// Wrong argument shape (e.g. `help a b`).
    #[error("Usage error: {0}")]
    Usage(String),

    /// The command body reported a failure.
    #[error("command '{command}' failed: {source}")]
    Execution {
        command: String,
        #[source]
        source: SharedSource,
    },
}

impl CrankError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a global options error with the given message.
    pub fn global_options(msg: impl Into<String>) -> Self {
        Self::GlobalOptions(msg.into())
    }

    /// Creates a usage error with the given message.
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Creates an unknown command error carrying "did you mean" candidates.
    pub fn unknown_command(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownCommand {
            name: name.into(),
            suggestions,
        }
    }

    /// Wraps a failure reported by a command body.
    pub fn execution(command: impl Into<String>, err: anyhow::Error) -> Self {
        let boxed: Box<dyn StdError + Send + Sync + 'static> = err.into();
        Self::Execution {
            command: command.into(),
            source: Arc::from(boxed),
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::GlobalOptions(_) => "Global Options Error",
            Self::UnknownCommand { .. } | Self::UnknownSubcommand { .. } => "Resolution Error",
            Self::Usage(_) => "Usage Error",
            Self::Execution { .. } => "Execution Error",
        }
    }

    /// Suggestions attached to a resolution error, empty for everything else.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::UnknownCommand { suggestions, .. }
            | Self::UnknownSubcommand { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}

/// Result type alias using CrankError.
pub type Result<T> = std::result::Result<T, CrankError>;
