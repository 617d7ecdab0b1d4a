use super::{ToolRuntime, Value};
use crate::application::tooling::ToolError;
use crate::domain::{ToolInvocation, ToolOutcome};
use tracing::{info, warn};

pub(crate) enum ToolExecution {
    /// The tool ran; the outcome may still be unsuccessful.
    Completed {
        invocation: ToolInvocation,
        outcome: ToolOutcome,
    },
    /// A destructive statement was stopped before reaching the database.
    Blocked {
        invocation: ToolInvocation,
        error: ToolError,
    },
    /// The request could not be dispatched at all.
    Rejected(ToolError),
}

impl ToolRuntime {
    pub(crate) async fn execute(&self, tool_name: &str, input: Value) -> ToolExecution {
        let invocation = match self.registry().resolve(tool_name, &input) {
            Ok(invocation) => invocation,
            Err(error) => {
                warn!(requested_tool = %tool_name, %error, "Model requested an invalid tool call");
                return ToolExecution::Rejected(error);
            }
        };

        match self.registry().execute(&invocation).await {
            Ok(outcome) => {
                info!(
                    tool = %invocation.name(),
                    success = outcome.success,
                    notice = outcome.notice.as_deref(),
                    "Tool executed"
                );
                ToolExecution::Completed {
                    invocation,
                    outcome,
                }
            }
            Err(error) if error.is_destructive() => ToolExecution::Blocked { invocation, error },
            Err(error) => {
                warn!(tool = %invocation.name(), %error, "Tool execution failed");
                let outcome = ToolOutcome::failed(invocation.name(), error.user_message());
                ToolExecution::Completed {
                    invocation,
                    outcome,
                }
            }
        }
    }
}
