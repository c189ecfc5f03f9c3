use async_trait::async_trait;

use crate::{
    error::{Result, TubesenseError},
    provider::Provider,
};

/// A single-prompt text completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-compatible `/chat/completions` client
pub struct ChatCompletionClient {
    http: reqwest::Client,
    provider: Provider,
    api_url: String,
    api_key: String,
    temperature: f32,
}

impl ChatCompletionClient {
    /// Client with deterministic sampling, keyed from the provider's env var
    pub fn new(provider: Provider) -> Result<Self> {
        let api_key = provider.validate_api_key()?;
        Ok(Self::with_api_key(provider, api_key))
    }

    pub fn with_api_key(provider: Provider, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider,
            api_url: provider.config().api_url.to_string(),
            api_key,
            temperature: 0.0,
        }
    }

    /// Send requests to another OpenAI-compatible endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let config = self.provider.config();

        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": self.temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TubesenseError::CompletionFailed {
                reason: format!("{} returned {}: {}", self.provider.name(), status, body),
            });
        }

        let response = response.json::<serde_json::Value>().await?;
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| TubesenseError::CompletionFailed {
                reason: format!("Invalid API response: {:?}", response),
            })?;

        Ok(content.to_string())
    }
}
