use crate::application::service::AskService;
use crate::infrastructure::model::ModelProvider;
use std::sync::Arc;

pub(crate) struct ServerState<P: ModelProvider> {
    service: Arc<AskService<P>>,
}

impl<P: ModelProvider> ServerState<P> {
    pub(crate) fn new(service: Arc<AskService<P>>) -> Self {
        Self { service }
    }

    pub(crate) fn service(&self) -> &AskService<P> {
        &self.service
    }
}
