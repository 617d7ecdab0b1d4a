use super::dto::{
    HealthResponse, RestAskRequest, RestAskResponse, SessionClearedResponse, ToolInventoryResponse,
};
use super::routes;
use crate::application::agent::AgentStep;
use crate::domain::{AnswerStatus, SideEffectClass, ToolName, ToolSpec};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::ask::ask_handler,
        routes::tools::tools_handler,
        routes::sessions::clear_session_handler,
        routes::health::health_handler
    ),
    components(
        schemas(
            RestAskRequest,
            RestAskResponse,
            ToolInventoryResponse,
            HealthResponse,
            SessionClearedResponse,
            AgentStep,
            AnswerStatus,
            ToolSpec,
            ToolName,
            SideEffectClass
        )
    ),
    tags(
        (name = "ask", description = "Natural-language questions answered from the database"),
        (name = "tools", description = "Database tools available to the agent"),
        (name = "sessions", description = "Conversation memory management"),
        (name = "health", description = "Liveness probe")
    )
)]
pub(super) struct ApiDoc;
