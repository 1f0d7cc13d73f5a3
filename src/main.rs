//! # Main Entry Point
//!
//! Boots the bot:
//! - Domain: Configuration, schema and types
//! - Infrastructure: Discord, Lightsail, website probe
//! - Application: Dispatcher, registry, logging
//!
//! Commands are registered in the guild once the gateway reports `ready` and
//! removed again on Ctrl-C before the process exits.

mod application;
mod domain;
mod infrastructure;
mod strings;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serenity::Client;
use serenity::model::gateway::GatewayIntents;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::dispatcher::CommandDispatcher;
use crate::application::registry::CommandRegistry;
use crate::domain::config::AppConfig;
use crate::infrastructure::discord::{
    DiscordRegistrar, Handler, RegistrationState, registration_settled,
};
use crate::infrastructure::lightsail::LightsailService;
use crate::infrastructure::website::HttpProbe;
use crate::strings::logs;

#[derive(Debug, Parser)]
#[command(name = "lightsail-warden", about = "Discord control of a Lightsail instance")]
struct Cli {
    /// YAML config file; environment variables override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

enum Exit {
    Interrupted,
    RegistrationFailed(String),
    ClientStopped(Result<()>),
}

async fn registration_failure(mut rx: watch::Receiver<RegistrationState>) -> String {
    loop {
        if let RegistrationState::Failed(reason) = &*rx.borrow_and_update() {
            return reason.clone();
        }
        if rx.changed().await.is_err() {
            // Sender gone with the client; the client branch reports that.
            std::future::pending::<()>().await;
        }
    }
}

fn log_session_end(joined: Result<Result<()>, tokio::task::JoinError>) {
    match joined {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("{}", logs::session_end_fail(&format!("{e:#}"))),
        Err(e) => tracing::warn!("{}", logs::session_end_fail(&e.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging)?;
    tracing::info!("{}", logs::STARTING);
    tracing::debug!("Configuration: {:?}", config);

    // 3. External clients
    let control = Arc::new(LightsailService::new(&config.lightsail.region).await);
    let probe = Arc::new(HttpProbe::new());
    let dispatcher = Arc::new(CommandDispatcher::new(&config, control, probe));

    // 4. Discord session
    let (registration_tx, registration_rx) = watch::channel(RegistrationState::Pending);
    let shutdown_rx = registration_rx.clone();
    let handler = Handler::new(dispatcher, config.discord.guild_id, registration_tx);
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;
    let mut client = Client::builder(&config.discord.token, intents)
        .event_handler(handler)
        .await
        .context("Failed to create Discord client")?;

    let shard_manager = client.shard_manager.clone();
    let registry = CommandRegistry::new(
        Arc::new(DiscordRegistrar::new(client.http.clone())),
        config.discord.guild_id,
    );

    let mut session = tokio::spawn(async move {
        client
            .start()
            .await
            .context("Discord client stopped with an error")
    });

    // 5. Wait for Ctrl-C, a fatal registration error, or the session ending
    let exit = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::error!("{}", logs::shutdown_fail(&e.to_string()));
            }
            Exit::Interrupted
        }
        reason = registration_failure(registration_rx) => Exit::RegistrationFailed(reason),
        joined = &mut session => Exit::ClientStopped(
            joined.map_err(|e| anyhow!("Discord client task panicked: {e}")).and_then(|r| r)
        ),
    };

    // 6. Shutdown
    match exit {
        Exit::Interrupted => {
            tracing::info!("{}", logs::SHUTDOWN);
            // A registration still in flight would land after the retract.
            registration_settled(shutdown_rx).await;
            registry.retract_best_effort().await;
            shard_manager.shutdown_all().await;
            log_session_end(session.await);
            Ok(())
        }
        Exit::RegistrationFailed(reason) => {
            shard_manager.shutdown_all().await;
            log_session_end(session.await);
            Err(anyhow!("Command registration failed: {reason}"))
        }
        Exit::ClientStopped(result) => {
            result?;
            Ok(())
        }
    }
}
