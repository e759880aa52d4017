//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::infrastructure::adapters::telegram::API_BASE;
use crate::infrastructure::joke::DEFAULT_ENDPOINT;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub joke: JokeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_base: String,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct JokeConfig {
    pub endpoint: String,
    pub on_failure: JokeFailurePolicy,
}

/// What `/joke` does when the joke API call fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JokeFailurePolicy {
    /// Tell the user and keep serving
    #[default]
    Reply,
    /// Stop the bot with a fatal error
    Exit,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "jokebot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: API_BASE.to_string(),
            poll_timeout_seconds: 10,
        }
    }
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            on_failure: JokeFailurePolicy::Reply,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Overlay process environment variables on top of this config
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TOKEN").or_else(|| lookup("BOT_TOKEN")) {
            self.telegram.token = Some(token);
        }

        if let Some(prefix) = lookup("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Some(endpoint) = lookup("JOKE_API_URL") {
            self.joke.endpoint = endpoint;
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.telegram.token = token;
        }
        self
    }

    /// Returns the bot token, or why it can't be used
    pub fn token(&self) -> Result<&str, ConfigError> {
        let token = self.telegram.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("TOKEN".to_string()))?;

        // Telegram tokens look like "<bot id>:<secret>"
        let valid = token
            .split_once(':')
            .map(|(id, secret)| {
                !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !secret.is_empty()
            })
            .unwrap_or(false);

        if !valid {
            return Err(ConfigError::InvalidValue("TOKEN is not a Telegram bot token".to_string()));
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bot.prefix, "/");
        assert_eq!(config.telegram.poll_timeout_seconds, 10);
        assert_eq!(config.joke.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.joke.on_failure, JokeFailurePolicy::Reply);
        assert!(config.telegram.token.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "joke:\n  on-failure: exit\ntelegram:\n  poll-timeout-seconds: 30\n",
        )
        .unwrap();

        assert_eq!(config.joke.on_failure, JokeFailurePolicy::Exit);
        assert_eq!(config.joke.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.telegram.poll_timeout_seconds, 30);
        assert_eq!(config.bot.name, "jokebot");
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = Config::from_yaml("joke:\n  on-failure: explode\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("poll-timeout-seconds"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.joke.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_from(env(&[
            ("TOKEN", "123:abc"),
            ("BOT_PREFIX", "!"),
            ("JOKE_API_URL", "http://localhost/joke"),
        ]));

        assert_eq!(config.telegram.token.as_deref(), Some("123:abc"));
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.joke.endpoint, "http://localhost/joke");
    }

    #[test]
    fn test_token_prefers_token_over_bot_token() {
        let mut config = Config::default();
        config.apply_env_from(env(&[("TOKEN", "1:a"), ("BOT_TOKEN", "2:b")]));
        assert_eq!(config.telegram.token.as_deref(), Some("1:a"));

        let mut config = Config::default();
        config.apply_env_from(env(&[("BOT_TOKEN", "2:b")]));
        assert_eq!(config.telegram.token.as_deref(), Some("2:b"));
    }

    #[test]
    fn test_cli_token_overrides() {
        let config = Config::default()
            .with_token(Some("9:cli".to_string()));
        assert_eq!(config.token().unwrap(), "9:cli");

        let config = config.with_token(None);
        assert_eq!(config.token().unwrap(), "9:cli");
    }

    #[test]
    fn test_missing_token() {
        let config = Config::default();
        assert!(matches!(config.token(), Err(ConfigError::MissingField(_))));

        let config = Config::default().with_token(Some("   ".to_string()));
        assert!(matches!(config.token(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_malformed_token() {
        for bad in ["no-colon", ":secret", "12ab:secret", "123:"] {
            let config = Config::default().with_token(Some(bad.to_string()));
            assert!(
                matches!(config.token(), Err(ConfigError::InvalidValue(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_token_is_trimmed() {
        let config = Config::default().with_token(Some(" 123456:ABC-def \n".to_string()));
        assert_eq!(config.token().unwrap(), "123456:ABC-def");
    }
}
