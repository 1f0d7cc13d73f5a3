//! # Discord Adapter
//!
//! Bridges serenity's gateway events and HTTP API to the platform-neutral
//! dispatcher and registry. Converts interactions into `CommandEvent`s,
//! sends `Reply`s as interaction responses, and writes the command schema
//! to the guild.

use async_trait::async_trait;
use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use serenity::client::{Context, EventHandler};
use serenity::http::Http;
use serenity::model::application::{
    CommandDataOption, CommandDataOptionValue, CommandInteraction, CommandOptionType, Interaction,
};
use serenity::model::gateway::Ready;
use serenity::model::id::{GuildId, RoleId, UserId};
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::dispatcher::CommandDispatcher;
use crate::application::registry::CommandRegistry;
use crate::domain::error::RegistryError;
use crate::domain::schema::{CommandSpec, ROOT_COMMAND};
use crate::domain::traits::{CommandRegistrar, ReplySink};
use crate::domain::types::{CommandEvent, Principal, Reply};
use crate::strings::logs;

/// Startup registration progress, observed by the interaction handler and `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    Pending,
    Registering,
    Registered,
    Failed(String),
}

/// Writes guild commands through serenity's HTTP client.
pub struct DiscordRegistrar {
    http: Arc<Http>,
}

impl DiscordRegistrar {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn build_command(spec: &CommandSpec) -> CreateCommand {
    spec.groups
        .iter()
        .fold(
            CreateCommand::new(spec.name).description(spec.description),
            |command, group| {
                let option = group.subcommands.iter().fold(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommandGroup,
                        group.name,
                        group.description,
                    ),
                    |option, sub| {
                        option.add_sub_option(CreateCommandOption::new(
                            CommandOptionType::SubCommand,
                            sub.name,
                            sub.description,
                        ))
                    },
                );
                command.add_option(option)
            },
        )
}

#[async_trait]
impl CommandRegistrar for DiscordRegistrar {
    async fn overwrite_guild_commands(
        &self,
        guild_id: u64,
        commands: &[CommandSpec],
    ) -> Result<(), RegistryError> {
        let builders = commands.iter().map(build_command).collect();
        GuildId::new(guild_id)
            .set_commands(&self.http, builders)
            .await
            .map(|_| ())
            .map_err(|e| RegistryError {
                guild_id,
                message: e.to_string(),
            })
    }
}

/// Sends the reply for one interaction.
pub struct InteractionResponder<'a> {
    http: Arc<Http>,
    interaction: &'a CommandInteraction,
}

#[async_trait]
impl ReplySink for InteractionResponder<'_> {
    async fn send_reply(&self, reply: &Reply) -> Result<(), String> {
        let message = CreateInteractionResponseMessage::new()
            .content(&reply.content)
            .ephemeral(reply.ephemeral);
        self.interaction
            .create_response(&self.http, CreateInteractionResponse::Message(message))
            .await
            .map_err(|e| e.to_string())
    }
}

/// Role lookup fails closed: no member payload means no identity.
pub fn principal(user: UserId, member_roles: Option<&[RoleId]>) -> Principal {
    let user_id = user.to_string();
    match member_roles {
        Some(roles) => Principal::Member {
            user_id,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        },
        None => Principal::Unresolved { user_id },
    }
}

/// Extracts (group, subcommand) from `/gfcbot <group> <subcommand>`.
pub fn routing_key(
    command_name: &str,
    options: &[CommandDataOption],
) -> (Option<String>, Option<String>) {
    if command_name != ROOT_COMMAND {
        return (None, None);
    }
    let Some(first) = options.first() else {
        return (None, None);
    };
    match &first.value {
        CommandDataOptionValue::SubCommandGroup(subs) => (
            Some(first.name.clone()),
            subs.first().map(|s| s.name.clone()),
        ),
        CommandDataOptionValue::SubCommand(_) => (None, Some(first.name.clone())),
        _ => (None, None),
    }
}

fn command_event(interaction: &CommandInteraction) -> CommandEvent {
    let (group, subcommand) = routing_key(&interaction.data.name, &interaction.data.options);
    CommandEvent {
        group,
        subcommand,
        principal: principal(
            interaction.user.id,
            interaction.member.as_ref().map(|m| m.roles.as_slice()),
        ),
    }
}

/// Holds an event until registration has finished; false when it failed.
pub async fn registration_ready(mut rx: watch::Receiver<RegistrationState>) -> bool {
    matches!(
        rx.wait_for(|s| {
            !matches!(s, RegistrationState::Pending | RegistrationState::Registering)
        })
        .await
        .map(|s| (*s).clone()),
        Ok(RegistrationState::Registered)
    )
}

/// Waits out an in-flight registration so a retract cannot be overtaken by it.
pub async fn registration_settled(
    mut rx: watch::Receiver<RegistrationState>,
) -> RegistrationState {
    let settled = rx
        .wait_for(|s| *s != RegistrationState::Registering)
        .await
        .map(|s| (*s).clone());
    settled.unwrap_or_else(|_| (*rx.borrow()).clone())
}

pub struct Handler {
    dispatcher: Arc<CommandDispatcher>,
    guild_id: u64,
    registration: watch::Sender<RegistrationState>,
}

impl Handler {
    pub fn new(
        dispatcher: Arc<CommandDispatcher>,
        guild_id: u64,
        registration: watch::Sender<RegistrationState>,
    ) -> Self {
        Self {
            dispatcher,
            guild_id,
            registration,
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{}", logs::logged_in(&ready.user.name));

        // Ready fires again after a reconnect; only the first registration counts.
        if *self.registration.borrow() == RegistrationState::Registered {
            return;
        }

        self.registration.send_replace(RegistrationState::Registering);
        let registry =
            CommandRegistry::new(Arc::new(DiscordRegistrar::new(ctx.http.clone())), self.guild_id);
        let state = match registry.register().await {
            Ok(()) => {
                tracing::info!("{}", logs::RUNNING);
                RegistrationState::Registered
            }
            Err(e) => {
                tracing::error!("{}", e);
                RegistrationState::Failed(e.to_string())
            }
        };
        self.registration.send_replace(state);
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if !registration_ready(self.registration.subscribe()).await {
            tracing::warn!(
                "Dropping interaction {} received without a command registration",
                command.id
            );
            return;
        }

        let event = command_event(&command);
        let responder = InteractionResponder {
            http: ctx.http.clone(),
            interaction: &command,
        };
        self.dispatcher.on_command(&event, &responder).await;
    }
}
