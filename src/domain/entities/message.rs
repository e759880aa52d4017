use super::User;
use chrono::{DateTime, Utc};

/// Type of message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Text,
    Command,
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::Command => "command",
        }
    }
}

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Empty,
}

/// Represents an incoming message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            message_type: MessageType::Text,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        let mut msg = Self::new(chat_id, Content::Command { name: name.into(), args });
        msg.message_type = MessageType::Command;
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_sets_type() {
        let msg = Message::from_command("42", "joke", vec!["now".to_string()]);
        assert_eq!(msg.message_type, MessageType::Command);
        assert_eq!(
            msg.content,
            Content::Command { name: "joke".to_string(), args: vec!["now".to_string()] }
        );
    }

    #[test]
    fn test_from_text_is_not_command() {
        let msg = Message::from_text("42", "hi there");
        assert_eq!(msg.content, Content::Text("hi there".to_string()));
        assert_eq!(msg.message_type.as_str(), "text");
    }

    #[test]
    fn test_messages_get_distinct_ids() {
        let a = Message::from_text("1", "a");
        let b = Message::from_text("1", "a");
        assert_ne!(a.id, b.id);
    }
}
