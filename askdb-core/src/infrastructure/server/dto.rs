use crate::application::agent::AgentStep;
use crate::application::service::{Answer, AskRequest};
use crate::domain::{AnswerStatus, ToolSpec};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestAskRequest {
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl From<RestAskRequest> for AskRequest {
    fn from(request: RestAskRequest) -> Self {
        AskRequest {
            question: request.question,
            session_id: request.session_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestAskResponse {
    pub answer: String,
    pub status: AnswerStatus,
    pub session_id: String,
    pub steps: Vec<AgentStep>,
}

impl From<Answer> for RestAskResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.answer,
            status: answer.status,
            session_id: answer.session_id,
            steps: answer.steps,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToolInventoryResponse {
    pub dialect: String,
    pub max_rows: usize,
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub sessions: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionClearedResponse {
    pub session_id: String,
    pub cleared: bool,
}
