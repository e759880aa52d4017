//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Joke: The joke API client
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod joke;
pub mod adapters;
