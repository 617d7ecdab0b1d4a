//! Provider factory - creates clients from config

use super::clients::{OllamaClient, OpenAIClient};
use super::traits::ModelClient;
use crate::config::{ModelConfig, ProviderKind};

/// Factory for creating model clients from the model config.
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(config: &ModelConfig) -> Box<dyn ModelClient> {
        match config.provider {
            ProviderKind::Ollama => Box::new(OllamaClient::from_config(config)),
            ProviderKind::OpenAi => Box::new(OpenAIClient::from_config(config)),
        }
    }
}
