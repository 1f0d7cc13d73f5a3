//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (Discord, Lightsail, HTTP).

pub mod discord;
pub mod lightsail;
pub mod website;
