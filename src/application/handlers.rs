//! The bot's commands: `/start`, `/hello`, `/joke`, `/imfeelinglucky`

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::application::services::CommandService;
use crate::domain::entities::{Command, CommandHandler, Message};
use crate::infrastructure::config::JokeFailurePolicy;
use crate::infrastructure::joke::{Joke, JokeSource};

/// Commands in the order they are listed and registered
pub const COMMANDS: [(&str, &str); 4] = [
    ("start", "show this message"),
    ("hello", "say hello"),
    ("joke", "get a random joke"),
    ("imfeelinglucky", "the why"),
];

pub const HELLO_TEXT: &str = "hello world";

pub const LUCKY_TEXT: &str =
    "escaping t-shaped matrix, forging complexity. specialize is dead, intersections are in.";

pub const JOKE_FAILURE_TEXT: &str = "couldn't fetch a joke right now, try again later.";

pub fn start_text() -> String {
    let mut text = String::from("i merely exist through these commands:\n\n");
    let lines: Vec<String> = COMMANDS
        .iter()
        .map(|(name, description)| format!("/{} - {}", name, description))
        .collect();
    text.push_str(&lines.join("\n"));
    text
}

/// Both halves lower-cased, joined by one space
pub fn format_joke(joke: &Joke) -> String {
    format!("{} {}", joke.setup.to_lowercase(), joke.punchline.to_lowercase())
}

/// `/joke`: asks the joke source for a fresh joke on every call
pub struct JokeCommand {
    source: Arc<dyn JokeSource>,
    on_failure: JokeFailurePolicy,
}

impl JokeCommand {
    pub fn new(source: Arc<dyn JokeSource>, on_failure: JokeFailurePolicy) -> Self {
        Self { source, on_failure }
    }
}

#[async_trait]
impl CommandHandler for JokeCommand {
    async fn handle(&self, message: &Message) -> Result<String, CommandError> {
        match self.source.fetch_joke().await {
            Ok(joke) => Ok(format_joke(&joke)),
            Err(e) => match self.on_failure {
                JokeFailurePolicy::Reply => {
                    tracing::warn!("error getting joke for chat {}: {}", message.chat_id, e);
                    Ok(JOKE_FAILURE_TEXT.to_string())
                }
                JokeFailurePolicy::Exit => Err(CommandError::Fatal(format!("error getting joke: {}", e))),
            },
        }
    }
}

fn description(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, d)| *d)
        .unwrap_or("")
}

/// Register all four commands on the service
pub fn register_commands(
    commands: &mut CommandService,
    jokes: Arc<dyn JokeSource>,
    on_failure: JokeFailurePolicy,
) {
    let start = Command::from_fn("start", |_| Ok(start_text()))
        .with_description(description("start"));
    commands.register(start);

    let hello = Command::from_fn("hello", |_| Ok(HELLO_TEXT.to_string()))
        .with_description(description("hello"));
    commands.register(hello);

    let joke = Command::new("joke", JokeCommand::new(jokes, on_failure))
        .with_description(description("joke"));
    commands.register(joke);

    let lucky = Command::from_fn("imfeelinglucky", |_| Ok(LUCKY_TEXT.to_string()))
        .with_description(description("imfeelinglucky"));
    commands.register(lucky);
}
