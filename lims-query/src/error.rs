//! Error types for the LIMS query layer.
//!
//! Configuration problems are fatal at startup; query problems propagate
//! to the caller untouched. The layer never retries or suppresses a
//! database error - retry policy belongs to the polling jobs embedding it.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias for all query-layer operations.
pub type LimsResult<T> = Result<T, LimsError>;

/// Errors surfaced by configuration loading and query execution.
#[derive(Debug, Error)]
pub enum LimsError {
    /// No configuration file exists at any of the searched locations.
    #[error("no configuration file found (searched {searched:?})")]
    ConfigFileNotFound { searched: Vec<PathBuf> },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML.
    #[error("failed to parse configuration file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required configuration key is absent.
    #[error("configuration file {} is missing required key `{key}`", .path.display())]
    MissingConfigKey { path: PathBuf, key: &'static str },

    /// The supplied time window is not expressible as a Postgres interval.
    #[error("invalid interval {0:?}: expected a count and unit such as \"2 hours\"")]
    InvalidInterval(String),

    /// The connection pool could not be created from the configuration.
    #[error("failed to create connection pool: {0}")]
    Pool(#[from] deadpool_postgres::CreatePoolError),

    /// No connection could be acquired from the pool.
    #[error("failed to acquire database connection: {0}")]
    Checkout(#[from] deadpool_postgres::PoolError),

    /// A query failed at the database.
    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// A query exceeded the configured client-side timeout.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}
