use crate::application::tooling::{
    Cell, ColumnHeader, ColumnInfo, DatabaseError, RawRows, RegistryLimits, SqlDatabase,
    ToolRegistry,
};
use crate::domain::{ChatMessage, MessageRole};
use crate::infrastructure::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone)]
pub(crate) struct ScriptedProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Duration,
}

impl ScriptedProvider {
    pub(crate) fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            recordings: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Every reply takes `delay` to arrive.
    pub(crate) fn slow(responses: Vec<&str>, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(responses)
        }
    }

    pub(crate) async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.recordings.lock().await.push(request.clone());
        let next = {
            let mut responses = self.responses.lock().await;
            (!responses.is_empty()).then(|| responses.remove(0))
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let Some(response) = next else {
            return Err(ModelError::invalid_response("scripted", "script exhausted"));
        };
        Ok(ModelResponse {
            message: ChatMessage::new(MessageRole::Assistant, response),
            session_id: request.session_id,
        })
    }
}

/// A `customers` table with seven rows.
#[derive(Default)]
pub(crate) struct ShopDatabase {
    executed: std::sync::Mutex<Vec<String>>,
}

impl ShopDatabase {
    pub(crate) fn executed(&self) -> Vec<String> {
        self.executed.lock().map(|sql| sql.clone()).unwrap_or_default()
    }

    fn customers() -> RawRows {
        RawRows {
            columns: vec![
                ColumnHeader::new("id", "INT"),
                ColumnHeader::new("name", "VARCHAR"),
                ColumnHeader::new("created_at", "DATETIME"),
            ],
            rows: (1..=7)
                .map(|id| {
                    vec![
                        Cell::Text(id.to_string()),
                        Cell::Text(format!("Customer {id}")),
                        Cell::Text(format!("2024-01-0{id} 09:30:00")),
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
        let column = |name: &str, data_type: &str, key: Option<&str>| ColumnInfo {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: key.is_none(),
            key: key.map(str::to_string),
            default: None,
        };
        Ok(Some(vec![
            column("id", "int", Some("PRI")),
            column("name", "varchar(255)", None),
            column("created_at", "datetime", None),
        ]))
    }

    async fn sample_rows(&self, _table: &str, limit: usize) -> Result<RawRows, DatabaseError> {
        let mut rows = Self::customers();
        rows.rows.truncate(limit);
        Ok(rows)
    }

    async fn prepare(&self, _sql: &str) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn fetch_read_only(&self, sql: &str, limit: usize) -> Result<RawRows, DatabaseError> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }
        let upper = sql.to_ascii_uppercase();
        if !upper.contains("CUSTOMERS") {
            return Err(DatabaseError::Statement(
                "Table 'shop.invoices' doesn't exist".to_string(),
            ));
        }
        if upper.contains("COUNT(") {
            return Ok(RawRows {
                columns: vec![ColumnHeader::new("COUNT(*)", "BIGINT")],
                rows: vec![vec![Cell::Text("7".into())]],
            });
        }
        let mut rows = Self::customers();
        rows.rows.truncate(limit);
        Ok(rows)
    }
}

pub(crate) fn shop_registry(max_rows: usize) -> (Arc<ToolRegistry>, Arc<ShopDatabase>) {
    let database = Arc::new(ShopDatabase::default());
    let handle: Arc<dyn SqlDatabase> = database.clone();
    let registry = ToolRegistry::new(
        handle,
        RegistryLimits {
            max_rows,
            sample_rows: 3,
            table_cache_ttl: Duration::from_secs(30),
        },
    );
    (Arc::new(registry), database)
}
