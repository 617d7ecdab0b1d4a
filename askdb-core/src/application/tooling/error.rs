use crate::domain::ToolName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The engine rejected the statement (syntax, unknown column, ...).
    #[error("{0}")]
    Statement(String),
    #[error("database unavailable: {0}")]
    Unavailable(String),
    #[error("failed to decode column '{column}': {reason}")]
    Decode { column: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: ToolName, reason: String },
    #[error("table '{0}' does not exist")]
    TableNotFound(String),
    #[error("statement rejected: {reason}")]
    NotReadOnly { reason: String },
    #[error("refusing to run a {keyword} statement")]
    Destructive { keyword: String },
    #[error("'{tool}' failed: {source}")]
    Query {
        tool: ToolName,
        #[source]
        source: DatabaseError,
    },
}

impl ToolError {
    pub fn query(tool: ToolName, source: DatabaseError) -> Self {
        ToolError::Query { tool, source }
    }

    /// Destructive statements end the loop with a clarification request.
    pub fn is_destructive(&self) -> bool {
        matches!(self, ToolError::Destructive { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            ToolError::UnknownTool(name) => {
                format!(
                    "Tool \"{name}\" does not exist. Available tools: {}.",
                    ToolName::ALL.map(ToolName::as_str).join(", ")
                )
            }
            ToolError::InvalidArguments { tool, reason } => {
                format!("Tool \"{tool}\" was called with invalid arguments: {reason}")
            }
            ToolError::TableNotFound(table) => {
                format!("Table \"{table}\" was not found. Call list_tables to see what exists.")
            }
            ToolError::NotReadOnly { reason } => {
                format!("Only a single read-only statement can be run: {reason}")
            }
            ToolError::Destructive { keyword } => format!(
                "This would run a {keyword} statement, which changes the database. \
                 I can only read data. Could you clarify what you would like to see instead?"
            ),
            ToolError::Query { source, .. } => source.to_string(),
        }
    }
}
