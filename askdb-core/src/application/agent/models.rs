use crate::config::defaults::{DEFAULT_MAX_CORRECTIONS, DEFAULT_MAX_STEPS};
use crate::domain::{AnswerStatus, Message, ToolInvocation, ToolOutcome};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Audit record of one executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AgentStep {
    pub tool: String,
    #[schema(value_type = Object)]
    pub input: Value,
    pub success: bool,
    #[schema(value_type = Object)]
    pub output: Value,
    pub message: Option<String>,
}

impl AgentStep {
    pub fn from_execution(invocation: &ToolInvocation, outcome: &ToolOutcome) -> Self {
        Self {
            tool: invocation.name().as_str().to_string(),
            input: invocation.arguments(),
            success: outcome.success,
            output: outcome.payload.clone(),
            message: outcome.message(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentOutcome {
    pub status: AnswerStatus,
    pub answer: String,
    pub steps: Vec<AgentStep>,
    /// The question's turn, ready to be committed to the conversation.
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub session_id: Option<String>,
    pub max_steps: usize,
    pub max_corrections: usize,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            session_id: None,
            max_steps: DEFAULT_MAX_STEPS,
            max_corrections: DEFAULT_MAX_CORRECTIONS,
        }
    }
}
