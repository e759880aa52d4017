use crate::domain::entities::{Command, CommandRegistry, Message, Content};
use crate::application::errors::CommandError;

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        tracing::debug!("Registering command /{}", command.name);
        self.registry.register(command);
    }

    /// Run the handler for a command message.
    ///
    /// `Ok(None)` means there is nothing to reply: plain text, or a command
    /// nobody registered.
    pub async fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let Some(cmd) = self.registry.find(name) else {
            tracing::debug!("Ignoring unknown command /{} in chat {}", name, message.chat_id);
            return Ok(None);
        };

        tracing::info!("Handling /{} for chat {} ({} args)", cmd.name, message.chat_id, args.len());

        cmd.handler.handle(message).await.map(Some)
    }

    /// (name, description) of every command, in registration order
    pub fn commands(&self) -> Vec<(String, String)> {
        self.registry
            .all()
            .map(|cmd| (cmd.name.clone(), cmd.description.clone().unwrap_or_default()))
            .collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
