use super::docs::ApiDoc;
use super::error::ServerError;
use super::routes;
use super::state::ServerState;
use crate::application::service::AskService;
use crate::infrastructure::model::ModelProvider;
use axum::Router;
use axum::routing::{delete, get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// All routes with CORS open to any origin, method and header.
pub fn build_router<P>(service: Arc<AskService<P>>) -> Router
where
    P: ModelProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(ServerState::new(service));
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .route("/ask", post(routes::ask::ask_handler::<P>))
        .route("/tools", get(routes::tools::tools_handler::<P>))
        .route(
            "/sessions/{session_id}",
            delete(routes::sessions::clear_session_handler::<P>),
        )
        .route("/health", get(routes::health::health_handler::<P>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub(super) async fn serve<P>(service: Arc<AskService<P>>, addr: SocketAddr) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    info!(%addr, "Binding REST server");
    let app = build_router(service);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "REST server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(error) => warn!(%error, "Failed to listen for shutdown signal"),
    }
}
