use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a question ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Answered,
    Clarification,
    Refused,
    MemoryCleared,
    Incomplete,
    Failed,
    Timeout,
}

impl AnswerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerStatus::Answered => "answered",
            AnswerStatus::Clarification => "clarification",
            AnswerStatus::Refused => "refused",
            AnswerStatus::MemoryCleared => "memory_cleared",
            AnswerStatus::Incomplete => "incomplete",
            AnswerStatus::Failed => "failed",
            AnswerStatus::Timeout => "timeout",
        }
    }
}
