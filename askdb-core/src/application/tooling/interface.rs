use super::error::DatabaseError;
use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

/// Column metadata as reported by the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub name: String,
    /// Driver type name, e.g. `DATETIME` or `BIGINT UNSIGNED`.
    pub type_name: String,
}

impl ColumnHeader {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A cell exactly as the driver handed it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Undecoded result set. Normalisation into JSON happens in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRows {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<Vec<Cell>>,
}

/// Database capability the tools are built on.
///
/// Implementations must never mutate data through `fetch_read_only`, must
/// stop reading after `limit` rows, and must treat table names as opaque
/// identifiers that have already been checked against `list_tables`.
#[async_trait]
pub trait SqlDatabase: Send + Sync {
    fn dialect(&self) -> &str;

    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    /// `Ok(None)` when the table does not exist.
    async fn describe_table(&self, table: &str) -> Result<Option<Vec<ColumnInfo>>, DatabaseError>;

    async fn sample_rows(&self, table: &str, limit: usize) -> Result<RawRows, DatabaseError>;

    /// Asks the engine to parse and resolve the statement without running it.
    async fn prepare(&self, sql: &str) -> Result<(), DatabaseError>;

    async fn fetch_read_only(&self, sql: &str, limit: usize) -> Result<RawRows, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
