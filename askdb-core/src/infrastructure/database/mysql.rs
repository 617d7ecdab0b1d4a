use crate::application::tooling::{Cell, ColumnHeader, ColumnInfo, DatabaseError, RawRows, SqlDatabase};
use crate::config::DatabaseConfig;
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Connection, Executor, Row, TypeInfo, ValueRef};
use tracing::{debug, info, warn};

/// [`SqlDatabase`] over a MySQL connection pool.
///
/// Ad-hoc statements go through the text protocol so every value arrives as
/// its textual rendering and can be normalised uniformly.
#[derive(Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
    dialect: String,
}

impl MySqlDatabase {
    pub async fn connect(config: &DatabaseConfig, dialect: impl Into<String>) -> Result<Self, DatabaseError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);
        let pool = MySqlPoolOptions::new()
            .min_connections(1)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(map_error)?;
        info!(url = %config.redacted_url(), max_connections = config.max_connections, "MySQL pool connected");
        Ok(Self::from_pool(pool, dialect))
    }

    pub fn from_pool(pool: MySqlPool, dialect: impl Into<String>) -> Self {
        Self {
            pool,
            dialect: dialect.into(),
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl SqlDatabase for MySqlDatabase {
    fn dialect(&self) -> &str {
        &self.dialect
    }

    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(TABLE_NAME AS CHAR) AS name
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE()
              AND TABLE_TYPE IN ('BASE TABLE', 'VIEW')
            ORDER BY TABLE_NAME
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(map_error))
            .collect()
    }

    async fn describe_table(&self, table: &str) -> Result<Option<Vec<ColumnInfo>>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(COLUMN_NAME AS CHAR) AS name,
                   CAST(COLUMN_TYPE AS CHAR) AS data_type,
                   CAST(IS_NULLABLE AS CHAR) AS nullable,
                   CAST(COLUMN_KEY AS CHAR) AS column_key,
                   CAST(COLUMN_DEFAULT AS CHAR) AS column_default
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let columns = rows
            .iter()
            .map(|row| -> Result<ColumnInfo, sqlx::Error> {
                let key: String = row.try_get("column_key")?;
                let nullable: String = row.try_get("nullable")?;
                Ok(ColumnInfo {
                    name: row.try_get("name")?,
                    data_type: row.try_get("data_type")?,
                    nullable: nullable.eq_ignore_ascii_case("YES"),
                    key: (!key.is_empty()).then_some(key),
                    default: row.try_get("column_default")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_error)?;
        Ok(Some(columns))
    }

    async fn sample_rows(&self, table: &str, limit: usize) -> Result<RawRows, DatabaseError> {
        let sql = format!("SELECT * FROM {} LIMIT {limit}", quote_identifier(table));
        let mut conn = self.pool.acquire().await.map_err(map_error)?;
        collect_rows(&mut conn, &sql, limit).await
    }

    /// Server-side prepare: the statement is parsed and its tables resolved,
    /// but nothing runs.
    async fn prepare(&self, sql: &str) -> Result<(), DatabaseError> {
        (&self.pool).prepare(sql).await.map_err(map_error)?;
        Ok(())
    }

    /// The transaction is owned by sqlx, so a caller that drops this future
    /// mid-stream still gets it rolled back before the connection is reused.
    async fn fetch_read_only(&self, sql: &str, limit: usize) -> Result<RawRows, DatabaseError> {
        let mut conn = self.pool.acquire().await.map_err(map_error)?;
        (&mut *conn)
            .execute("SET TRANSACTION READ ONLY")
            .await
            .map_err(map_error)?;
        let mut tx = conn.begin().await.map_err(map_error)?;

        let result = collect_rows(&mut tx, sql, limit).await;

        if let Err(error) = tx.rollback().await {
            warn!(%error, "Failed to roll back read-only transaction");
        }
        result
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

/// Reads at most `limit` rows, then drops the stream.
async fn collect_rows(
    conn: &mut MySqlConnection,
    sql: &str,
    limit: usize,
) -> Result<RawRows, DatabaseError> {
    let mut stream = conn.fetch(sql);
    let mut raw = RawRows::default();
    while raw.rows.len() < limit {
        let Some(row) = stream.try_next().await.map_err(map_error)? else {
            break;
        };
        if raw.columns.is_empty() {
            raw.columns = headers(&row);
        }
        raw.rows.push(decode_row(&row)?);
    }
    debug!(rows = raw.rows.len(), limit, "Collected result rows");
    Ok(raw)
}

fn headers(row: &MySqlRow) -> Vec<ColumnHeader> {
    row.columns()
        .iter()
        .map(|column| ColumnHeader::new(column.name(), column.type_info().name()))
        .collect()
}

fn decode_row(row: &MySqlRow) -> Result<Vec<Cell>, DatabaseError> {
    (0..row.len()).map(|index| decode_cell(row, index)).collect()
}

fn decode_cell(row: &MySqlRow, index: usize) -> Result<Cell, DatabaseError> {
    let decode_error = |error: sqlx::Error| DatabaseError::Decode {
        column: row.columns()[index].name().to_string(),
        reason: error.to_string(),
    };

    if row.try_get_raw(index).map_err(decode_error)?.is_null() {
        return Ok(Cell::Null);
    }
    match row.try_get_unchecked::<String, _>(index) {
        Ok(text) => Ok(Cell::Text(text)),
        Err(_) => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Cell::Bytes)
            .map_err(decode_error),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn map_error(error: sqlx::Error) -> DatabaseError {
    match error {
        sqlx::Error::Database(db) => DatabaseError::Statement(db.message().to_string()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => DatabaseError::Unavailable(error.to_string()),
        sqlx::Error::ColumnDecode { index, source } => DatabaseError::Decode {
            column: index,
            reason: source.to_string(),
        },
        other => DatabaseError::Statement(other.to_string()),
    }
}
