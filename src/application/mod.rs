//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command dispatch and reply orchestration
//! - Handlers: The bot's commands
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing

pub mod errors;
pub mod handlers;
pub mod services;
pub mod messaging;
