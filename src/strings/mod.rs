//! # Strings Module
//!
//! Centralizes user-facing replies and operator log lines.

pub mod logs;
pub mod messages;
