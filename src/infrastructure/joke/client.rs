//! Official Joke API client

use async_trait::async_trait;
use reqwest::Client;

use super::traits::{FetchError, Joke, JokeResponse, JokeSource};

/// Public random joke endpoint
pub const DEFAULT_ENDPOINT: &str = "https://official-joke-api.appspot.com/random_joke";

/// Client for the official joke API. One GET per call, nothing cached.
pub struct OfficialJokeClient {
    client: Client,
    endpoint: String,
}

impl OfficialJokeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl JokeSource for OfficialJokeClient {
    async fn fetch_joke(&self) -> Result<Joke, FetchError> {
        tracing::debug!("Fetching joke from {}", self.endpoint);

        let response = self.client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.without_url().to_string()))?;

        let data: JokeResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!("Got joke #{} ({})", data.id, data.kind);
        Joke::try_from(data)
    }
}
