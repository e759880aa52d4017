//! Joke source traits - what the `/joke` command consumes

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Raw envelope returned by the joke API
#[derive(Debug, Clone, Deserialize)]
pub struct JokeResponse {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub setup: Option<String>,
    pub punchline: Option<String>,
    #[serde(default)]
    pub id: i64,
}

/// The two text fields the bot actually uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

impl Joke {
    pub fn new(setup: impl Into<String>, punchline: impl Into<String>) -> Self {
        Self {
            setup: setup.into(),
            punchline: punchline.into(),
        }
    }
}

impl TryFrom<JokeResponse> for Joke {
    type Error = FetchError;

    fn try_from(response: JokeResponse) -> Result<Self, Self::Error> {
        let setup = response.setup.ok_or(FetchError::MissingField("setup"))?;
        let punchline = response.punchline.ok_or(FetchError::MissingField("punchline"))?;
        Ok(Joke::new(setup, punchline))
    }
}

/// Joke fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("error fetching joke: {0}")]
    Network(String),

    #[error("joke api returned status {0}")]
    Status(u16),

    #[error("error decoding joke: {0}")]
    Decode(String),

    #[error("joke is missing field: {0}")]
    MissingField(&'static str),
}

/// Anything that can hand out a random joke
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch_joke(&self) -> Result<Joke, FetchError>;
}
