use super::tool::{ToolInvocation, ToolOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    User,
    Assistant,
    Tool,
}

/// One entry of a session's conversation. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: ConversationRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolOutcome>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: ConversationRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call: None,
            tool_result: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ConversationRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ConversationRole::Assistant, content)
    }

    pub fn tool_call(invocation: ToolInvocation) -> Self {
        let mut message = Self::new(
            ConversationRole::Assistant,
            format!("calling {}", invocation.name()),
        );
        message.tool_call = Some(invocation);
        message
    }

    pub fn tool_result(outcome: ToolOutcome) -> Self {
        let content = match (&outcome.error, &outcome.notice) {
            (Some(error), _) => format!("{} failed: {error}", outcome.tool),
            (None, Some(notice)) => format!("{} succeeded ({notice})", outcome.tool),
            (None, None) => format!("{} succeeded", outcome.tool),
        };
        let mut message = Self::new(ConversationRole::Tool, content);
        message.tool_result = Some(outcome);
        message
    }
}
