//! # Command Registry
//!
//! Publishes the slash command schema to the configured guild at startup and
//! clears it again at shutdown. Both operations overwrite the whole guild set,
//! so repeating either one leaves the same end state.

use std::sync::Arc;

use crate::domain::error::RegistryError;
use crate::domain::schema::{CommandSpec, command_schema};
use crate::domain::traits::CommandRegistrar;
use crate::strings::logs;

pub struct CommandRegistry {
    registrar: Arc<dyn CommandRegistrar>,
    guild_id: u64,
    schema: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new(registrar: Arc<dyn CommandRegistrar>, guild_id: u64) -> Self {
        Self {
            registrar,
            guild_id,
            schema: command_schema(),
        }
    }

    pub async fn register(&self) -> Result<(), RegistryError> {
        self.registrar
            .overwrite_guild_commands(self.guild_id, &self.schema)
            .await?;
        tracing::info!("{}", logs::commands_registered(self.guild_id));
        Ok(())
    }

    pub async fn retract(&self) -> Result<(), RegistryError> {
        self.registrar
            .overwrite_guild_commands(self.guild_id, &[])
            .await?;
        tracing::info!("{}", logs::commands_removed(self.guild_id));
        Ok(())
    }

    /// Shutdown variant of `retract`: failures are logged and swallowed.
    pub async fn retract_best_effort(&self) {
        if let Err(e) = self.retract().await {
            tracing::error!("{}", logs::remove_commands_failed(&e.to_string()));
        }
    }
}
