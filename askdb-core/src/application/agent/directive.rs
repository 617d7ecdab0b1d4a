use serde_json::Value;

/// One interpreted model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentDirective {
    CallTool { tool: String, input: Value },
    Final { response: String },
    Clarify { question: String },
    Refuse { response: String },
}
