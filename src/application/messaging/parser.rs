//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Content, Message, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Commands addressed to another bot (`/joke@other_bot`) are treated as text
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        if text.trim().is_empty() {
            return Message::new(chat_id, Content::Empty).with_sender_opt(sender);
        }

        let message = match self.parse_command(&text) {
            Some((name, args)) => Message::from_command(chat_id, name, args),
            None => Message::from_text(chat_id, text),
        };
        message.with_sender_opt(sender)
    }

    /// Command name and arguments; `None` when the text is not a command for this bot
    fn parse_command(&self, text: &str) -> Option<(String, Vec<String>)> {
        let cmd_text = text
            .strip_prefix('/')
            .or_else(|| {
                if self.command_prefix.is_empty() {
                    None
                } else {
                    text.strip_prefix(self.command_prefix.as_str())
                }
            })?;

        if cmd_text.starts_with(char::is_whitespace) {
            return None;
        }

        let mut parts = cmd_text.split_whitespace();
        let token = parts.next()?;

        let name = match token.split_once('@') {
            Some((name, target)) => {
                if let Some(username) = &self.bot_username {
                    if !target.eq_ignore_ascii_case(username) {
                        return None;
                    }
                }
                name
            }
            None => token,
        };

        if name.is_empty() {
            return None;
        }

        Some((name.to_string(), parts.map(str::to_string).collect()))
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }
}
