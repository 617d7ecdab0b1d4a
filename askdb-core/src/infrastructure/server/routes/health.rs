use super::super::dto::HealthResponse;
use super::super::state::ServerState;
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::warn;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse)
    )
)]
pub async fn health_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
) -> Json<HealthResponse> {
    let service = state.service();
    let database = match service.registry().database().ping().await {
        Ok(()) => "ok",
        Err(error) => {
            warn!(%error, "Database ping failed");
            "unavailable"
        }
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
        sessions: service.store().len().await,
    })
}
