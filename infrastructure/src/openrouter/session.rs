//! OpenRouter session: one model plus an optional system prompt

use super::client::OpenRouterClient;
use async_trait::async_trait;
use council_application::{GatewayError, LlmSession};
use council_domain::Model;
use std::sync::Arc;

/// Chat completions are stateless, so a session only remembers the model
/// and system prompt to send with each message.
pub struct OpenRouterSession {
    client: Arc<OpenRouterClient>,
    model: Model,
    system_prompt: Option<String>,
}

impl OpenRouterSession {
    pub fn new(client: Arc<OpenRouterClient>, model: Model, system_prompt: Option<String>) -> Self {
        Self {
            client,
            model,
            system_prompt,
        }
    }
}

#[async_trait]
impl LlmSession for OpenRouterSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.client
            .complete(self.model.as_str(), self.system_prompt.as_deref(), content)
            .await
            .map_err(GatewayError::from)
    }
}
