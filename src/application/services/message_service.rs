use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::application::services::CommandService;
use crate::domain::entities::{Message, User};
use crate::domain::traits::Bot;

/// Turns incoming text into replies: parse, dispatch, send
pub struct MessageService<B: Bot> {
    bot: B,
    commands: CommandService,
    parser: MessageParser,
}

impl<B: Bot> MessageService<B> {
    /// The bot should already be started so its username is known
    pub fn new(bot: B, commands: CommandService) -> Self {
        let parser = MessageParser::new(commands.prefix())
            .with_bot_username(bot.bot_info().username);
        Self { bot, commands, parser }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    /// Parse raw text from a chat and process it
    pub async fn process_text(
        &self,
        chat_id: &str,
        text: &str,
        sender: Option<User>,
    ) -> Result<Option<String>, BotError> {
        let message = self.parser.parse(chat_id, text, sender);
        self.process(message).await
    }

    /// Process an incoming message and send the reply, if any.
    ///
    /// Command errors are fatal and returned without replying; send failures
    /// are only logged so the caller can keep serving other chats.
    pub async fn process(&self, message: Message) -> Result<Option<String>, BotError> {
        tracing::debug!(
            "Processing message {} ({}) from {} at {}: {:?}",
            message.id,
            message.message_type.as_str(),
            message.sender.as_ref().map_or_else(|| "unknown".to_string(), |u| u.to_string()),
            message.timestamp,
            message.content
        );

        let Some(response) = self.commands.handle(&message).await? else {
            return Ok(None);
        };

        self.respond(&message.chat_id, &response).await;
        Ok(Some(response))
    }

    /// Send a response message; failures are logged, not returned
    pub async fn respond(&self, chat_id: &str, text: &str) {
        tracing::info!("Sending response to chat_id {}: {}", chat_id, preview(text));
        if let Err(e) = self.bot.send_message(chat_id, text).await {
            tracing::error!("Failed to send message to {}: {}", chat_id, e);
        }
    }
}

/// First line of a reply, capped for logs
fn preview(text: &str) -> &str {
    let line = text.lines().next().unwrap_or("");
    match line.char_indices().nth(100) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
