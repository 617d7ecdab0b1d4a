//! Model types - Request, Response, and Error types

use crate::domain::{ChatMessage, MessageRole};
use reqwest::StatusCode;
use thiserror::Error;

/// Model request for LLM chat
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub session_id: Option<String>,
}

/// Model response from LLM
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
    pub session_id: Option<String>,
}

impl ModelResponse {
    pub fn new(content: String, session_id: Option<String>) -> Self {
        Self {
            message: ChatMessage::new(MessageRole::Assistant, content),
            session_id,
        }
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' is unavailable (status {status:?}): {reason}")]
    Unavailable {
        provider: String,
        status: Option<u16>,
        reason: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn unavailable(
        provider: impl Into<String>,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            status,
            reason: reason.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Connect failures, timeouts, rate limiting and 5xx answers are worth
    /// another attempt; everything else fails the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Unavailable { .. } => true,
            ModelError::Network { source, .. } => {
                source.is_connect()
                    || source.is_timeout()
                    || source
                        .status()
                        .is_some_and(|status| is_transient_status(status))
                    || (source.is_request() && source.status().is_none())
            }
            ModelError::MissingApiKey { .. } | ModelError::InvalidResponse { .. } => false,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ModelError::MissingApiKey { provider } => {
                format!("The language model provider '{provider}' is missing its API key.")
            }
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Could not connect to the language model provider '{provider}'.")
                } else if source.is_timeout() {
                    format!("The language model provider '{provider}' took too long to respond.")
                } else if let Some(status) = source.status() {
                    match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => format!(
                            "The language model provider '{provider}' rejected our credentials."
                        ),
                        StatusCode::NOT_FOUND => {
                            format!("The endpoint of provider '{provider}' was not found.")
                        }
                        _ => format!(
                            "The request to '{provider}' failed with status {}.",
                            status.as_u16()
                        ),
                    }
                } else {
                    format!("A network error occurred while calling '{provider}'.")
                }
            }
            ModelError::Unavailable { provider, .. } => {
                format!("The language model provider '{provider}' is currently unavailable.")
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("The language model provider '{provider}' returned an unreadable response.")
            }
        }
    }
}

pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
