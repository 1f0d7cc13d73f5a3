//! # Domain Layer
//!
//! Core definitions, types, and traits that define the business domain of the application.
//! Independent of Discord and AWS, serving as the contract for the other layers.

pub mod config;
pub mod error;
pub mod schema;
pub mod traits;
pub mod types;
