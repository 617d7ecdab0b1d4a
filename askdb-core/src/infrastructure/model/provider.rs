use async_trait::async_trait;

use super::factory::ProviderFactory;
use super::traits::{ModelClient, ModelProvider};
use super::types::{ModelError, ModelRequest, ModelResponse};
use crate::config::ModelConfig;

/// Model provider backed by the single configured client.
pub struct ConfiguredModelProvider {
    client: Box<dyn ModelClient>,
}

impl ConfiguredModelProvider {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            client: ProviderFactory::create(config),
        }
    }

    pub fn id(&self) -> &str {
        self.client.id()
    }
}

#[async_trait]
impl ModelProvider for ConfiguredModelProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.client.chat(request).await
    }
}
