// Shared fixtures for the integration tests: a scripted language model and
// an in-memory shop database.

#![allow(dead_code)]

use askdb_core::application::agent::Agent;
use askdb_core::application::client::{ChatClient, RetryPolicy};
use askdb_core::application::memory::ConversationStore;
use askdb_core::application::service::AskService;
use askdb_core::application::tooling::{
    Cell, ColumnHeader, ColumnInfo, DatabaseError, RawRows, RegistryLimits, SqlDatabase,
    ToolRegistry,
};
use askdb_core::config::{AgentSettings, PromptSettings};
use askdb_core::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use askdb_core::types::{ChatMessage, MessageRole};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

// ============================================================================
// Scripted model
// ============================================================================

#[derive(Clone, Default)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            ..Self::default()
        }
    }

    /// Every reply is held back for `delay`.
    pub fn slow(responses: Vec<&str>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(responses)
        }
    }

    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.recordings.lock().await.push(request.clone());
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Err(ModelError::unavailable("scripted", Some(503), "script exhausted"));
        }
        Ok(ModelResponse {
            message: ChatMessage::new(MessageRole::Assistant, responses.remove(0)),
            session_id: request.session_id,
        })
    }
}

// ============================================================================
// In-memory database
// ============================================================================

/// `customers(id, name, created_at)` with a configurable number of rows.
pub struct ShopDatabase {
    customers: usize,
    executed: std::sync::Mutex<Vec<String>>,
}

impl ShopDatabase {
    pub fn with_customers(customers: usize) -> Self {
        Self {
            customers,
            executed: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("executed lock").clone()
    }

    fn rows(&self, limit: usize) -> RawRows {
        RawRows {
            columns: vec![
                ColumnHeader::new("id", "INT"),
                ColumnHeader::new("name", "VARCHAR"),
                ColumnHeader::new("created_at", "DATETIME"),
            ],
            rows: (1..=self.customers)
                .take(limit)
                .map(|id| {
                    vec![
                        Cell::Text(id.to_string()),
                        Cell::Text(format!("Customer {id}")),
                        Cell::Text("2024-03-15 08:05:09".to_string()),
                    ]
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SqlDatabase for ShopDatabase {
    fn dialect(&self) -> &str {
        "MySQL"
    }

    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(vec!["customers".to_string()])
    }

    async fn describe_table(&self, table: &str) -> Result<Option<Vec<ColumnInfo>>, DatabaseError> {
        if table != "customers" {
            return Ok(None);
        }
        Ok(Some(vec![
            ColumnInfo {
                name: "id".to_string(),
                data_type: "int".to_string(),
                nullable: false,
                key: Some("PRI".to_string()),
                default: None,
            },
            ColumnInfo {
                name: "name".to_string(),
                data_type: "varchar(255)".to_string(),
                nullable: false,
                key: None,
                default: None,
            },
            ColumnInfo {
                name: "created_at".to_string(),
                data_type: "datetime".to_string(),
                nullable: true,
                key: None,
                default: None,
            },
        ]))
    }

    async fn sample_rows(&self, _table: &str, limit: usize) -> Result<RawRows, DatabaseError> {
        Ok(self.rows(limit))
    }

    async fn prepare(&self, sql: &str) -> Result<(), DatabaseError> {
        if sql.to_ascii_uppercase().contains("CUSTOMERS") {
            Ok(())
        } else {
            Err(DatabaseError::Statement(
                "Table 'shop.orders' doesn't exist".to_string(),
            ))
        }
    }

    async fn fetch_read_only(&self, sql: &str, limit: usize) -> Result<RawRows, DatabaseError> {
        self.executed.lock().expect("executed lock").push(sql.to_string());
        if sql.to_ascii_uppercase().contains("COUNT(") {
            return Ok(RawRows {
                columns: vec![ColumnHeader::new("COUNT(*)", "BIGINT")],
                rows: vec![vec![Cell::Text(self.customers.to_string())]],
            });
        }
        Ok(self.rows(limit))
    }
}

// ============================================================================
// Service wiring
// ============================================================================

pub fn agent_settings() -> AgentSettings {
    AgentSettings {
        dialect: "MySQL".to_string(),
        max_rows: 5,
        sample_rows: 3,
        max_steps: 10,
        max_corrections: 3,
        request_timeout: Duration::from_secs(60),
        schema_cache_ttl: Duration::from_secs(30),
    }
}

pub fn build_service(
    provider: ScriptedProvider,
    database: Arc<ShopDatabase>,
    settings: AgentSettings,
) -> AskService<ScriptedProvider> {
    let handle: Arc<dyn SqlDatabase> = database;
    let registry = Arc::new(ToolRegistry::new(
        handle,
        RegistryLimits {
            max_rows: settings.max_rows,
            sample_rows: settings.sample_rows,
            table_cache_ttl: settings.schema_cache_ttl,
        },
    ));
    let client = ChatClient::new(provider, "test-model", RetryPolicy::new(2, Duration::ZERO));
    let agent = Agent::new(Arc::new(client), registry, &PromptSettings::default());
    let store = Arc::new(ConversationStore::new(Duration::from_secs(600), 200));
    AskService::new(agent, store, settings)
}
