//! OpenRouter LLM Gateway implementation

use super::client::{OpenRouterClient, OpenRouterConfig};
use super::error::Result;
use super::session::OpenRouterSession;
use async_trait::async_trait;
use council_application::{GatewayError, LlmGateway, LlmSession};
use council_domain::Model;
use std::sync::Arc;
use tracing::info;

/// LLM Gateway for any OpenRouter-compatible chat completions API
pub struct OpenRouterGateway {
    client: Arc<OpenRouterClient>,
}

impl OpenRouterGateway {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = OpenRouterClient::new(config)?;
        info!("OpenRouterGateway initialized ({})", client.config().base_url);
        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create a gateway sharing an existing client
    pub fn with_client(client: Arc<OpenRouterClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<OpenRouterClient> {
        &self.client
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> std::result::Result<Box<dyn LlmSession>, GatewayError> {
        let system_prompt = Some(system_prompt.to_string()).filter(|s| !s.is_empty());
        Ok(Box::new(OpenRouterSession::new(
            Arc::clone(&self.client),
            model.clone(),
            system_prompt,
        )))
    }
}
