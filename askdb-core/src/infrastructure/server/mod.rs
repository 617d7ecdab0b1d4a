mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use dto::{
    HealthResponse, RestAskRequest, RestAskResponse, SessionClearedResponse, ToolInventoryResponse,
};
pub use error::ServerError;
pub use router::build_router;

use crate::application::service::AskService;
use crate::infrastructure::model::ModelProvider;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn serve<P>(service: Arc<AskService<P>>, addr: SocketAddr) -> Result<(), ServerError>
where
    P: ModelProvider + 'static,
{
    router::serve(service, addr).await
}
