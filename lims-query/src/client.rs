//! Database client wrapping the connection pool.
//!
//! All query modules hang their operations off [`LimsClient`] in
//! additional `impl` blocks. Every operation is a read-only single-shot
//! query; the client holds no state beyond the pool and an optional
//! client-side timeout.

use crate::config::DbConfig;
use crate::error::{LimsError, LimsResult};
use deadpool_postgres::Pool;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// Read-only client for the LIMS database.
#[derive(Clone)]
pub struct LimsClient {
    pool: Pool,
    query_timeout: Option<Duration>,
}

impl LimsClient {
    /// Create a new client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            query_timeout: None,
        }
    }

    /// Create a new client from configuration. This is the session
    /// factory: the configuration is borrowed, constructed once at
    /// startup by the caller.
    pub fn from_config(config: &DbConfig) -> LimsResult<Self> {
        Ok(Self::new(config.create_pool()?))
    }

    /// Bound every query with a client-side timeout. Purely a
    /// quality-of-life limit; no timeout is applied by default.
    pub fn with_query_timeout(mut self, limit: Duration) -> Self {
        self.query_timeout = Some(limit);
        self
    }

    /// Current pool size, for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    /// Get a connection from the pool.
    pub(crate) async fn get_conn(&self) -> LimsResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(LimsError::from)
    }

    /// Run one read query, applying the configured timeout if any.
    pub(crate) async fn query_rows(
        &self,
        conn: &deadpool_postgres::Object,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> LimsResult<Vec<Row>> {
        let query = conn.query(statement, params);
        match self.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, query).await {
                Ok(result) => result.map_err(LimsError::from),
                Err(_) => {
                    tracing::warn!(limit_ms = limit.as_millis() as u64, "query timed out");
                    Err(LimsError::Timeout(limit))
                }
            },
            None => query.await.map_err(LimsError::from),
        }
    }
}
