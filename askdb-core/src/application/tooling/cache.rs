use super::error::DatabaseError;
use super::interface::SqlDatabase;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    tables: Arc<Vec<String>>,
    fetched_at: Instant,
}

/// Short-lived cache of the table list.
pub struct TableCache {
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Returns the cached list, fetching it when absent or expired.
    pub async fn get(&self, database: &dyn SqlDatabase) -> Result<Arc<Vec<String>>, DatabaseError> {
        let mut entry = self.entry.lock().await;
        if let Some(current) = entry.as_ref() {
            if current.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&current.tables));
            }
        }
        let tables = Arc::new(database.list_tables().await?);
        debug!(count = tables.len(), "Refreshed table list cache");
        *entry = Some(Entry {
            tables: Arc::clone(&tables),
            fetched_at: Instant::now(),
        });
        Ok(tables)
    }

    /// Unconditionally refetches the list.
    pub async fn refresh(
        &self,
        database: &dyn SqlDatabase,
    ) -> Result<Arc<Vec<String>>, DatabaseError> {
        self.entry.lock().await.take();
        self.get(database).await
    }
}
