//! OpenRouter HTTP client

use super::error::{OpenRouterError, Result};
use super::protocol::{ChatMessage, ChatRequest, ChatResponse, ModelList};
use council_domain::CatalogEntry;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Connection and generation settings
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    pub api_key: String,
    /// Sent as `X-Title` for attribution on openrouter.ai
    pub app_name: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub request_timeout: Duration,
    /// Applied to the `/models` request only
    pub catalog_timeout: Duration,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            app_name: "llm-council".to_string(),
            max_tokens: Some(4096),
            temperature: None,
            request_timeout: Duration::from_secs(120),
            catalog_timeout: Duration::from_secs(10),
        }
    }

    /// Read the API key from `var`
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(OpenRouterError::MissingApiKey(var.to_string())),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Thin client over the chat completions and models endpoints
pub struct OpenRouterClient {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// One chat completion; returns the first choice's text
    pub async fn complete(&self, model: &str, system_prompt: Option<&str>, content: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(content));

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("POST {} (model {})", url, model);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("X-Title", &self.config.app_name)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenRouterError::Status { status, body });
        }

        let completion: ChatResponse = response.json().await?;
        if let Some(error) = completion.error {
            return Err(OpenRouterError::Api {
                code: error.code.unwrap_or(500),
                message: error.message,
            });
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| OpenRouterError::UnexpectedResponse("response contained no message content".to_string()))
    }

    /// Every model the provider lists
    pub async fn list_models(&self) -> Result<Vec<CatalogEntry>> {
        let url = format!("{}/models", self.config.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .timeout(self.config.catalog_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenRouterError::Status { status, body });
        }

        let list: ModelList = response.json().await?;
        Ok(list.data)
    }
}
