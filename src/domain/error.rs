//! # Errors
//!
//! Typed errors raised at the edges of the system. The dispatcher turns
//! `ControlError` into user-facing text; the others are startup/shutdown concerns.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("DISCORD_GUILD_ID must be a positive integer, got '{0}'")]
    InvalidGuildId(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Failure from the instance provider. The display text is what users see.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("{message}")]
    Provider {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to get instance state")]
    MissingState,
}

impl ControlError {
    pub fn provider(operation: &'static str, message: impl Into<String>) -> Self {
        ControlError::Provider {
            operation,
            message: message.into(),
        }
    }

    /// Provider operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            ControlError::Provider { operation, .. } => *operation,
            ControlError::MissingState => "GetInstance",
        }
    }
}

#[derive(Debug, Error)]
#[error("Command registration for guild {guild_id} failed: {message}")]
pub struct RegistryError {
    pub guild_id: u64,
    pub message: String,
}
