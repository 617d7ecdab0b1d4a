use super::super::dto::ToolInventoryResponse;
use super::super::state::ServerState;
use crate::infrastructure::model::ModelProvider;
use axum::Json;
use axum::extract::State;
use std::sync::Arc;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/tools",
    tag = "tools",
    responses(
        (status = 200, description = "Tools the agent can call", body = ToolInventoryResponse)
    )
)]
pub async fn tools_handler<P: ModelProvider>(
    State(state): State<Arc<ServerState<P>>>,
) -> Json<ToolInventoryResponse> {
    let registry = state.service().registry();
    debug!(tool_count = registry.specs().len(), "Serving /tools request");
    Json(ToolInventoryResponse {
        dialect: registry.dialect().to_string(),
        max_rows: registry.max_rows(),
        tools: registry.specs().to_vec(),
    })
}
