//! Text-completion provider client
//!
//! This module wraps the chat-completion endpoint used for variation
//! generation behind the [`CompletionProvider`] trait so the generator can
//! run against a mock in tests. The concrete client targets an Azure-style
//! OpenAI deployment endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the completion provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible service
    pub base_url: String,

    /// API key sent as `api-key` header
    pub api_key: String,

    /// Deployment / model name
    pub model: String,

    /// API version query parameter
    pub api_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            api_version: "2024-08-01-preview".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_default(),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            api_version: std::env::var("OPENAI_API_VERSION")
                .unwrap_or_else(|_| "2024-08-01-preview".to_string()),
            timeout_secs: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("OPENAI_BASE_URL is not set"));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::config("OPENAI_API_KEY is not set"));
        }
        Ok(())
    }

    /// Deployment-scoped chat completions URL
    pub fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base, self.model, self.api_version
        )
    }
}

/// Text-completion collaborator used by the generator
///
/// One call per generation task; `max_tokens` differs between short-form
/// and long-form tasks.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion and return the raw model text
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the completion endpoint
///
/// Constructed once at process start and passed into the generator; there is
/// no lazily-initialized global client.
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    /// Create a new provider client with the given config
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ProviderConfig::from_env())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "completion request failed: {status} - {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("invalid completion response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}
