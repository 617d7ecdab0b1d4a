use crate::application::client::ChatFailure;
use crate::infrastructure::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model unavailable after {attempts} attempt(s): {source}")]
    ModelUnavailable {
        attempts: u32,
        #[source]
        source: ModelError,
    },
    #[error(transparent)]
    Model(ModelError),
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl From<ChatFailure> for AgentError {
    fn from(failure: ChatFailure) -> Self {
        if failure.error.is_transient() {
            AgentError::ModelUnavailable {
                attempts: failure.attempts,
                source: failure.error,
            }
        } else {
            AgentError::Model(failure.error)
        }
    }
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::ModelUnavailable { source, .. } => format!(
                "{} Please try again in a moment.",
                source.user_message()
            ),
            AgentError::Model(err) => err.user_message(),
            AgentError::InvalidResponse(_) => {
                "The assistant kept producing responses that could not be understood. Please rephrase your question."
                    .to_string()
            }
            AgentError::Timeout { seconds } => format!(
                "Answering took longer than {seconds} seconds, so the request was stopped. Try a narrower question."
            ),
        }
    }
}
