//! # Domain Types
//!
//! Data structures shared between the dispatcher, the registry and the platform adapters.

use std::collections::HashSet;
use std::fmt;

/// Name of the single Lightsail instance this bot manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef(String);

impl InstanceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider state label (`running`, `stopped`, `pending`, ...). Never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceState(String);

impl InstanceState {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity behind an inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// A guild member whose roles are known.
    Member { user_id: String, roles: HashSet<String> },
    /// The event carried no guild member (DM, partial payload).
    Unresolved { user_id: String },
}

impl Principal {
    pub fn user_id(&self) -> &str {
        match self {
            Principal::Member { user_id, .. } | Principal::Unresolved { user_id } => user_id,
        }
    }
}

/// One slash-command invocation, already flattened to its routing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    pub group: Option<String>,
    pub subcommand: Option<String>,
    pub principal: Principal,
}

/// Outcome of a single website probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Up,
    UnexpectedStatus(u16),
    Unreachable(String),
}

/// The single message sent back for a `CommandEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Only the invoker sees the message.
    pub ephemeral: bool,
}

impl Reply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}
