use super::cache::TableCache;
use super::error::{DatabaseError, ToolError};
use super::interface::{ColumnInfo, SqlDatabase};
use super::rows::RowSet;
use crate::application::policy::{StatementClass, classify};
use crate::domain::{SideEffectClass, ToolInvocation, ToolName, ToolOutcome, ToolSpec};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
pub struct RegistryLimits {
    pub max_rows: usize,
    pub sample_rows: usize,
    pub table_cache_ttl: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rows: Option<RowSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub message: String,
}

impl ValidationReport {
    fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// The fixed set of database tools exposed to the model.
pub struct ToolRegistry {
    database: Arc<dyn SqlDatabase>,
    limits: RegistryLimits,
    tables: TableCache,
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new(database: Arc<dyn SqlDatabase>, limits: RegistryLimits) -> Self {
        Self {
            specs: build_specs(&limits),
            tables: TableCache::new(limits.table_cache_ttl),
            database,
            limits,
        }
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn dialect(&self) -> &str {
        self.database.dialect()
    }

    pub fn max_rows(&self) -> usize {
        self.limits.max_rows
    }

    pub fn database(&self) -> &Arc<dyn SqlDatabase> {
        &self.database
    }

    /// Renders the tool list for the system prompt.
    pub fn catalogue(&self) -> String {
        let mut lines = vec!["Available tools:".to_string()];
        for spec in &self.specs {
            let schema = serde_json::to_string(&spec.input_schema).unwrap_or_default();
            lines.push(format!(
                "- {}: {} Input schema: {}",
                spec.name, spec.description, schema
            ));
        }
        lines.join("\n")
    }

    /// Turns a model-supplied tool name and input into a typed invocation.
    pub fn resolve(&self, name: &str, input: &Value) -> Result<ToolInvocation, ToolError> {
        let tool =
            ToolName::parse(name).ok_or_else(|| ToolError::UnknownTool(name.trim().to_string()))?;
        match tool {
            ToolName::ListTables => Ok(ToolInvocation::ListTables),
            ToolName::GetSchema => {
                table_names_argument(input).map(|table_names| ToolInvocation::GetSchema {
                    table_names,
                })
            }
            ToolName::ValidateQuery => {
                sql_argument(tool, input).map(|sql| ToolInvocation::ValidateQuery { sql })
            }
            ToolName::RunQuery => {
                sql_argument(tool, input).map(|sql| ToolInvocation::RunQuery { sql })
            }
        }
    }

    pub async fn execute(&self, invocation: &ToolInvocation) -> Result<ToolOutcome, ToolError> {
        let tool = invocation.name();
        debug!(tool = %tool, "Executing tool");
        let outcome = match invocation {
            ToolInvocation::ListTables => {
                let tables = self.list_tables().await?;
                ToolOutcome::ok(tool, json!({ "tables": tables }))
            }
            ToolInvocation::GetSchema { table_names } => {
                let schemas = self.get_schema(table_names).await?;
                ToolOutcome::ok(tool, json!({ "tables": schemas }))
            }
            ToolInvocation::ValidateQuery { sql } => {
                let report = self.validate_query(sql).await?;
                ToolOutcome::ok(tool, json!(report))
            }
            ToolInvocation::RunQuery { sql } => {
                let rows = self.run_query(sql).await?;
                let truncated = rows.truncated;
                let outcome = ToolOutcome::ok(tool, json!(rows));
                if truncated {
                    outcome.with_notice(row_limit_notice(self.limits.max_rows))
                } else {
                    outcome
                }
            }
        };
        Ok(outcome)
    }

    pub async fn list_tables(&self) -> Result<Vec<String>, ToolError> {
        let tables = self
            .tables
            .get(self.database.as_ref())
            .await
            .map_err(|err| ToolError::query(ToolName::ListTables, err))?;
        Ok(tables.as_ref().clone())
    }

    /// Columns plus a few sample rows for each requested table.
    pub async fn get_schema(&self, table_names: &[String]) -> Result<Vec<TableSchema>, ToolError> {
        let mut schemas = Vec::with_capacity(table_names.len());
        for requested in table_names {
            let table = self.resolve_table(requested).await?;
            let columns = self
                .database
                .describe_table(&table)
                .await
                .map_err(|err| ToolError::query(ToolName::GetSchema, err))?
                .ok_or_else(|| ToolError::TableNotFound(table.clone()))?;
            let sample_rows = if self.limits.sample_rows > 0 {
                let raw = self
                    .database
                    .sample_rows(&table, self.limits.sample_rows)
                    .await
                    .map_err(|err| ToolError::query(ToolName::GetSchema, err))?;
                Some(RowSet::from_raw(raw, self.limits.sample_rows))
            } else {
                None
            };
            schemas.push(TableSchema {
                table,
                columns,
                sample_rows,
            });
        }
        Ok(schemas)
    }

    /// Dry-runs a statement. Nothing that is not read-only reaches the database.
    pub async fn validate_query(&self, sql: &str) -> Result<ValidationReport, ToolError> {
        match classify(sql) {
            StatementClass::Read(_) => match self.database.prepare(sql).await {
                Ok(()) => Ok(ValidationReport::valid(format!(
                    "The query is valid {}.",
                    self.dialect()
                ))),
                Err(DatabaseError::Statement(message)) => Ok(ValidationReport::invalid(message)),
                Err(err) => Err(ToolError::query(ToolName::ValidateQuery, err)),
            },
            StatementClass::Destructive { keyword } => Ok(ValidationReport::invalid(format!(
                "{keyword} statements modify the database and will not be run."
            ))),
            StatementClass::Rejected { reason } => Ok(ValidationReport::invalid(reason)),
        }
    }

    /// Runs a read-only statement, keeping at most `max_rows` rows.
    pub async fn run_query(&self, sql: &str) -> Result<RowSet, ToolError> {
        match classify(sql) {
            StatementClass::Read(kind) => {
                let limit = self.limits.max_rows;
                let raw = self
                    .database
                    .fetch_read_only(sql, limit.saturating_add(1))
                    .await
                    .map_err(|err| ToolError::query(ToolName::RunQuery, err))?;
                let rows = RowSet::from_raw(raw, limit);
                info!(?kind, rows = rows.row_count, truncated = rows.truncated, "Query executed");
                Ok(rows)
            }
            StatementClass::Destructive { keyword } => {
                warn!(keyword = %keyword, "Blocked destructive statement");
                Err(ToolError::Destructive { keyword })
            }
            StatementClass::Rejected { reason } => Err(ToolError::NotReadOnly { reason }),
        }
    }

    async fn resolve_table(&self, requested: &str) -> Result<String, ToolError> {
        let requested = requested.trim().trim_matches('`');
        let cached = self
            .tables
            .get(self.database.as_ref())
            .await
            .map_err(|err| ToolError::query(ToolName::GetSchema, err))?;
        if let Some(found) = find_table(&cached, requested) {
            return Ok(found);
        }
        let fresh = self
            .tables
            .refresh(self.database.as_ref())
            .await
            .map_err(|err| ToolError::query(ToolName::GetSchema, err))?;
        find_table(&fresh, requested).ok_or_else(|| ToolError::TableNotFound(requested.to_string()))
    }
}

pub fn row_limit_notice(max_rows: usize) -> String {
    format!("row limit exceeded: only the first {max_rows} rows are shown")
}

fn find_table(tables: &[String], requested: &str) -> Option<String> {
    if let Some(exact) = tables.iter().find(|table| table.as_str() == requested) {
        return Some(exact.clone());
    }
    let mut folded = tables
        .iter()
        .filter(|table| table.eq_ignore_ascii_case(requested));
    match (folded.next(), folded.next()) {
        (Some(only), None) => Some(only.clone()),
        _ => None,
    }
}

fn table_names_argument(input: &Value) -> Result<Vec<String>, ToolError> {
    let raw = match input {
        Value::Object(map) => map
            .get("table_names")
            .or_else(|| map.get("tables"))
            .or_else(|| map.get("table_name"))
            .cloned()
            .unwrap_or(Value::Null),
        other => other.clone(),
    };
    let names: Vec<String> = match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(list) => list.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let mut unique: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim().to_string();
        if !name.is_empty() && !unique.contains(&name) {
            unique.push(name);
        }
    }
    if unique.is_empty() {
        return Err(ToolError::InvalidArguments {
            tool: ToolName::GetSchema,
            reason: "expected a non-empty 'table_names' list".to_string(),
        });
    }
    Ok(unique)
}

fn sql_argument(tool: ToolName, input: &Value) -> Result<String, ToolError> {
    let sql = match input {
        Value::Object(map) => map
            .get("sql")
            .or_else(|| map.get("query"))
            .and_then(Value::as_str),
        Value::String(sql) => Some(sql.as_str()),
        _ => None,
    };
    match sql.map(str::trim) {
        Some(sql) if !sql.is_empty() => Ok(sql.to_string()),
        _ => Err(ToolError::InvalidArguments {
            tool,
            reason: "expected a non-empty 'sql' string".to_string(),
        }),
    }
}

fn build_specs(limits: &RegistryLimits) -> Vec<ToolSpec> {
    let sql_schema = json!({
        "type": "object",
        "properties": { "sql": { "type": "string" } },
        "required": ["sql"]
    });
    vec![
        ToolSpec {
            name: ToolName::ListTables,
            description: "List the names of all tables in the database. Call this first."
                .to_string(),
            input_schema: json!({ "type": "object", "properties": {} }),
            side_effect: SideEffectClass::ReadOnlyIntrospection,
        },
        ToolSpec {
            name: ToolName::GetSchema,
            description: format!(
                "Return the columns (type, nullability, key) and up to {} sample rows of each listed table.",
                limits.sample_rows
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table_names": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["table_names"]
            }),
            side_effect: SideEffectClass::ReadOnlyIntrospection,
        },
        ToolSpec {
            name: ToolName::ValidateQuery,
            description: "Check that a SQL query is well-formed without running it. Use it before run_query."
                .to_string(),
            input_schema: sql_schema.clone(),
            side_effect: SideEffectClass::ReadOnlyIntrospection,
        },
        ToolSpec {
            name: ToolName::RunQuery,
            description: format!(
                "Run one read-only SQL query and return at most {} rows. On an error, rewrite the query and try again.",
                limits.max_rows
            ),
            input_schema: sql_schema,
            side_effect: SideEffectClass::QueryExecution,
        },
    ]
}
