use super::super::dto::{RestAskRequest, RestAskResponse};
use super::super::state::ServerState;
use crate::domain::AnswerStatus;
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/ask",
    tag = "ask",
    request_body = RestAskRequest,
    responses(
        (status = 200, description = "Question handled; see `status` for how it ended", body = RestAskResponse),
        (status = 400, description = "Empty question or unreadable request body", body = RestAskResponse),
        (status = 502, description = "The language model could not be reached", body = RestAskResponse),
        (status = 504, description = "The request exceeded its deadline", body = RestAskResponse)
    )
)]
pub async fn ask_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    payload: Result<Json<RestAskRequest>, JsonRejection>,
) -> (StatusCode, Json<RestAskResponse>) {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable /ask request body");
            let answer = RestAskResponse {
                answer: format!(
                    "The request body must be a JSON object with a `question` field: {}",
                    rejection.body_text()
                ),
                status: AnswerStatus::Clarification,
                session_id: Uuid::new_v4().to_string(),
                steps: Vec::new(),
            };
            return (StatusCode::BAD_REQUEST, Json(answer));
        }
    };
    info!(
        session = payload.session_id.as_deref(),
        "Received /ask request"
    );
    let empty = payload.question.trim().is_empty();
    let answer = state.service().ask(payload.into()).await;

    let code = if empty {
        StatusCode::BAD_REQUEST
    } else {
        status_code(answer.status)
    };
    (code, Json(RestAskResponse::from(answer)))
}

fn status_code(status: AnswerStatus) -> StatusCode {
    match status {
        AnswerStatus::Failed => StatusCode::BAD_GATEWAY,
        AnswerStatus::Timeout => StatusCode::GATEWAY_TIMEOUT,
        AnswerStatus::Answered
        | AnswerStatus::Clarification
        | AnswerStatus::Refused
        | AnswerStatus::MemoryCleared
        | AnswerStatus::Incomplete => StatusCode::OK,
    }
}
