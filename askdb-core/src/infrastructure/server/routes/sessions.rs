use super::super::dto::SessionClearedResponse;
use super::super::state::ServerState;
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    tag = "sessions",
    params(("session_id" = String, Path, description = "Session to forget")),
    responses(
        (status = 200, description = "Session memory cleared", body = SessionClearedResponse)
    )
)]
pub async fn clear_session_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
    Path(session_id): Path<String>,
) -> Json<SessionClearedResponse> {
    let cleared = state.service().clear_session(&session_id).await;
    info!(session_id = session_id.as_str(), cleared, "Session clear requested");
    Json(SessionClearedResponse {
        session_id,
        cleared,
    })
}
