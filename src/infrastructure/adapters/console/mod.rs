//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::application::services::MessageService;
use crate::domain::traits::{Bot, BotInfo};

/// Chat id used for everything typed into the console
pub const CONSOLE_CHAT: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: Option<mpsc::Sender<String>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "jokebot".to_string(),
                username: "console".to_string(),
            },
            sender: None,
        }
    }

    /// Deliver replies to a channel instead of stdout
    #[cfg(test)]
    pub fn with_sender(mut self, sender: mpsc::Sender<String>) -> Self {
        self.sender = Some(sender);
        self
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        match &self.sender {
            Some(sender) => sender
                .send(text.to_string())
                .await
                .map_err(|e| BotError::Network(e.to_string()))?,
            None => println!("[BOT] {}", text),
        }
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Feed every line of `input` through the service until EOF
pub async fn run_lines<R>(service: &MessageService<ConsoleAdapter>, input: R) -> Result<(), BotError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        service.process_text(CONSOLE_CHAT, line, None).await?;
    }
    Ok(())
}

/// Interactive loop on stdin; stops on EOF or Ctrl-C
pub async fn run_console_bot(service: &MessageService<ConsoleAdapter>) -> Result<(), BotError> {
    let info = service.bot().bot_info();
    tracing::info!("Bot started: @{} (type /start, Ctrl-D to quit)", info.username);

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = run_lines(service, stdin) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
            Ok(())
        }
    }
}
