//! Telegram adapter

pub mod runner;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::entities;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Envelope around every Bot API result
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl From<&User> for entities::User {
    fn from(user: &User) -> Self {
        entities::User {
            id: user.id.to_string(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            is_bot: user.is_bot,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
    api_base: String,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "jokebot".to_string(),
                username: "jokebot".to_string(),
            },
            api_base: API_BASE.to_string(),
        }
    }

    /// Point the adapter at another Bot API server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Token prefix that is safe to log
    fn redacted_token(&self) -> &str {
        let end = self.token
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.token.len());
        &self.token[..end]
    }

    /// Call a Bot API method and unwrap the `{ok, result}` envelope.
    ///
    /// reqwest errors carry the request URL, which contains the token, so it
    /// is stripped before the error is formatted.
    async fn call<Req, T>(&self, method: &str, request: &Req) -> Result<T, BotError>
    where
        Req: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let data: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e.without_url())))?;

        if !data.ok {
            let description = data.description.unwrap_or_else(|| status.to_string());
            return Err(BotError::Api(format!("{} failed: {}", method, description)));
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{} returned no result", method)))
    }

    /// Fetch bot info from Telegram API; fails when the token is rejected
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            username: data.username.unwrap_or_else(|| data.first_name.clone()),
            name: data.first_name,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Offset to acknowledge everything in `updates`; unchanged when empty
    pub fn get_next_offset(current: i64, updates: &[Update]) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .map_or(current, |next| next.max(current))
    }

    /// Send a plain text message via Telegram API
    pub async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest { chat_id, text };
        let data: MessageResult = self.call("sendMessage", &request).await?;

        Ok(data.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct BotCommand<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<BotCommand<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|(command, description)| BotCommand { command, description })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request).await?;

        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", self.redacted_token());
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);
        self.send_message_api(chat_id, text).await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TOKEN: &str = "123456:test_token";

    fn update(id: i64) -> Update {
        Update { update_id: id, message: None }
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(TelegramAdapter::get_next_offset(0, &[]), 0);
        assert_eq!(TelegramAdapter::get_next_offset(42, &[]), 42);
        assert_eq!(TelegramAdapter::get_next_offset(0, &[update(5), update(9), update(7)]), 10);
        assert_eq!(TelegramAdapter::get_next_offset(20, &[update(5)]), 20);
    }

    #[test]
    fn test_redacted_token() {
        let adapter = TelegramAdapter::new(TOKEN);
        assert_eq!(adapter.redacted_token(), "123456:t");
        assert_eq!(TelegramAdapter::new("abc").redacted_token(), "abc");
    }

    #[test]
    fn test_api_url_trims_slash() {
        let adapter = TelegramAdapter::new(TOKEN).with_api_base("http://localhost:8081/");
        assert_eq!(adapter.api_url("getMe"), "http://localhost:8081/bot123456:test_token/getMe");
    }

    #[test]
    fn test_update_decodes_with_unknown_fields() {
        let raw = r#"{
            "update_id": 10,
            "message": {
                "message_id": 3,
                "date": 1706529600,
                "from": {"id": 77, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "chat": {"id": 77, "type": "private"},
                "text": "/joke"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.text.as_deref(), Some("/joke"));

        let user = entities::User::from(message.from.as_ref().unwrap());
        assert_eq!(user.id, "77");
        assert_eq!(user.username.as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn test_fetch_bot_info() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/getMe", TOKEN).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":{"id":42,"is_bot":true,"first_name":"Joke Bot","username":"joke_bot"}}"#)
            .create_async()
            .await;

        let mut adapter = TelegramAdapter::new(TOKEN).with_api_base(server.url());
        adapter.fetch_bot_info().await.unwrap();

        let info = adapter.bot_info();
        assert_eq!(info.id, "42");
        assert_eq!(info.username, "joke_bot");
        assert_eq!(info.name, "Joke Bot");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_token_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", format!("/bot{}/getMe", TOKEN).as_str())
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
            .create_async()
            .await;

        let mut adapter = TelegramAdapter::new(TOKEN).with_api_base(server.url());
        let err = adapter.fetch_bot_info().await.unwrap_err();
        assert!(matches!(&err, BotError::Api(msg) if msg.contains("Unauthorized")), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_send_message_plain_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/sendMessage", TOKEN).as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "chat_id": "77",
                "text": "hello world"
            })))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":{"message_id":5,"date":0,"chat":{"id":77,"type":"private"}}}"#)
            .create_async()
            .await;

        let adapter = TelegramAdapter::new(TOKEN).with_api_base(server.url());
        let id = adapter.send_message("77", "hello world").await.unwrap();
        assert_eq!(id, "5");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_updates_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .match_body(Matcher::PartialJson(serde_json::json!({
                "offset": 11,
                "timeout": 10
            })))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":[{"update_id":11,"message":{"message_id":1,"chat":{"id":5},"text":"/hello"}}]}"#)
            .create_async()
            .await;

        let adapter = TelegramAdapter::new(TOKEN).with_api_base(server.url());
        let updates = adapter.get_updates(11, 10).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 11);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_commands() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/setMyCommands", TOKEN).as_str())
            .match_body(Matcher::Json(serde_json::json!({
                "commands": [
                    {"command": "start", "description": "show this message"},
                    {"command": "hello", "description": "say hello"}
                ]
            })))
            .with_status(200)
            .with_body(r#"{"ok":true,"result":true}"#)
            .create_async()
            .await;

        let adapter = TelegramAdapter::new(TOKEN).with_api_base(server.url());
        let commands = vec![
            ("start".to_string(), "show this message".to_string()),
            ("hello".to_string(), "say hello".to_string()),
        ];
        adapter.register_commands(&commands).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let adapter = TelegramAdapter::new(TOKEN).with_api_base(server.url());
        let err = adapter.get_updates(0, 10).await.unwrap_err();
        assert!(matches!(err, BotError::Parse(_)), "got {:?}", err);
        assert!(!err.to_string().contains("test_token"), "token leaked: {}", err);
    }

    #[tokio::test]
    async fn test_network_error_hides_token() {
        let adapter = TelegramAdapter::new("123456:SUPERSECRETTOKEN").with_api_base("http://127.0.0.1:1");

        let err = adapter.get_updates(0, 0).await.unwrap_err();
        assert!(matches!(err, BotError::Network(_)), "got {:?}", err);
        assert!(!err.to_string().contains("SUPERSECRETTOKEN"), "token leaked: {}", err);
        assert!(!format!("{:?}", err).contains("SUPERSECRETTOKEN"), "token leaked: {:?}", err);
    }
}
