use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Handles one invocation of a command and produces the reply text
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, message: &Message) -> Result<String, CommandError>;
}

/// Adapts a plain closure into a [`CommandHandler`]
struct FnHandler<F>(F);

#[async_trait]
impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&Message) -> Result<String, CommandError> + Send + Sync,
{
    async fn handle(&self, message: &Message) -> Result<String, CommandError> {
        (self.0)(message)
    }
}

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new<H>(name: impl Into<String>, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            handler: Arc::new(handler),
        }
    }

    /// Synchronous handler, for replies that need no I/O
    pub fn from_fn<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        Self::new(name, FnHandler(handler))
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Command registry, keeps registration order for listings
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
    order: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command; re-registering a name replaces the handler in place.
    pub fn register(&mut self, command: Command) {
        let key = command.name.to_lowercase();
        if !self.commands.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.commands.insert(key, command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.get(&input.to_lowercase())
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.order.iter().filter_map(|name| self.commands.get(name))
    }
}
