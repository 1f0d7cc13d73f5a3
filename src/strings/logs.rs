//! # Log Messages
//!
//! Operator-facing log lines that are emitted from more than one place.

pub const STARTING: &str = "Starting Lightsail Warden...";
pub const RUNNING: &str = "Bot is running. Press CTRL+C to exit.";
pub const SHUTDOWN: &str = "Shutting down...";

pub fn logged_in(name: &str) -> String {
    format!("Logged in as {name}")
}

pub fn commands_registered(guild_id: u64) -> String {
    format!("Registered slash commands in guild {guild_id}")
}

pub fn commands_removed(guild_id: u64) -> String {
    format!("Removed slash commands from guild {guild_id}")
}

pub fn remove_commands_failed(err: &str) -> String {
    format!("Error removing commands: {err}")
}

pub fn shutdown_fail(err: &str) -> String {
    format!("Unable to listen for shutdown signal: {err}")
}

pub fn session_end_fail(err: &str) -> String {
    format!("Discord session did not stop cleanly: {err}")
}
