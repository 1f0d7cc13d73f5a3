//! # Application Layer
//!
//! Contains the core logic of the bot: the authorization gate, the command
//! dispatcher, command registration, and logging setup.

pub mod auth;
pub mod dispatcher;
pub mod logging;
pub mod registry;
