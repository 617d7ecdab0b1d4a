use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use utoipa::ToSchema;

/// The closed set of tools the model may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    ListTables,
    GetSchema,
    ValidateQuery,
    RunQuery,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::ListTables,
        ToolName::GetSchema,
        ToolName::ValidateQuery,
        ToolName::RunQuery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::ListTables => "list_tables",
            ToolName::GetSchema => "get_schema",
            ToolName::ValidateQuery => "validate_query",
            ToolName::RunQuery => "run_query",
        }
    }

    /// Case-insensitive lookup; `-` and `_` are treated alike.
    pub fn parse(value: &str) -> Option<Self> {
        let normalised = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == normalised)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SideEffectClass {
    ReadOnlyIntrospection,
    QueryExecution,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolSpec {
    pub name: ToolName,
    pub description: String,
    #[schema(value_type = Object)]
    pub input_schema: Value,
    pub side_effect: SideEffectClass,
}

/// A validated tool request emitted by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "input", rename_all = "snake_case")]
pub enum ToolInvocation {
    ListTables,
    GetSchema { table_names: Vec<String> },
    ValidateQuery { sql: String },
    RunQuery { sql: String },
}

impl ToolInvocation {
    pub fn name(&self) -> ToolName {
        match self {
            ToolInvocation::ListTables => ToolName::ListTables,
            ToolInvocation::GetSchema { .. } => ToolName::GetSchema,
            ToolInvocation::ValidateQuery { .. } => ToolName::ValidateQuery,
            ToolInvocation::RunQuery { .. } => ToolName::RunQuery,
        }
    }

    pub fn arguments(&self) -> Value {
        match self {
            ToolInvocation::ListTables => json!({}),
            ToolInvocation::GetSchema { table_names } => json!({ "table_names": table_names }),
            ToolInvocation::ValidateQuery { sql } | ToolInvocation::RunQuery { sql } => {
                json!({ "sql": sql })
            }
        }
    }

    /// Directive form the model itself uses to request this call.
    pub fn to_directive(&self) -> Value {
        json!({
            "action": "call_tool",
            "tool": self.name().as_str(),
            "input": self.arguments(),
        })
    }
}

/// Result of executing one [`ToolInvocation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub tool: ToolName,
    pub success: bool,
    pub payload: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ToolOutcome {
    pub fn ok(tool: ToolName, payload: Value) -> Self {
        Self {
            tool,
            success: true,
            payload,
            error: None,
            notice: None,
        }
    }

    pub fn failed(tool: ToolName, error: impl Into<String>) -> Self {
        Self {
            tool,
            success: false,
            payload: Value::Null,
            error: Some(error.into()),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Short human readable summary used for step logs.
    pub fn message(&self) -> Option<String> {
        self.error.clone().or_else(|| self.notice.clone())
    }
}
