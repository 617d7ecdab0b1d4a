mod execution;
mod instructions;
mod parser;

use std::sync::Arc;

use crate::application::tooling::ToolRegistry;

pub(super) use super::directive::AgentDirective;
pub(super) use super::errors::AgentError;
pub(crate) use execution::ToolExecution;
pub(super) use serde_json::{Value, json};

/// Bridges model directives and the tool registry.
pub struct ToolRuntime {
    registry: Arc<ToolRegistry>,
}

impl ToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
