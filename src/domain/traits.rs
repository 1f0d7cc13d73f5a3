//! # Domain Traits
//!
//! Abstract interfaces for the external systems the bot talks to.
//! The dispatcher and registry only see these, so tests can swap in fakes.

use async_trait::async_trait;

use crate::domain::error::{ControlError, RegistryError};
use crate::domain::schema::CommandSpec;
use crate::domain::types::{InstanceRef, InstanceState, ProbeOutcome, Reply};

/// Where the reply for one command event goes.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, reply: &Reply) -> Result<(), String>;
}

/// Lifecycle control over one compute instance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstanceControl: Send + Sync {
    /// Returns once the provider accepted the request, not when the instance is up.
    async fn start_instance(&self, instance: &InstanceRef) -> Result<(), ControlError>;

    async fn stop_instance(&self, instance: &InstanceRef) -> Result<(), ControlError>;

    async fn reboot_instance(&self, instance: &InstanceRef) -> Result<(), ControlError>;

    async fn get_instance_state(&self, instance: &InstanceRef)
    -> Result<InstanceState, ControlError>;
}

/// One-shot liveness check of a URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebsiteProbe: Send + Sync {
    async fn check(&self, url: &str) -> ProbeOutcome;
}

/// Guild-scoped slash command storage on the chat platform.
#[async_trait]
pub trait CommandRegistrar: Send + Sync {
    /// Replace every command in the guild with `commands` (empty clears them).
    async fn overwrite_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandSpec],
    ) -> Result<(), RegistryError>;
}
