//! Database configuration and session factory.
//!
//! Connection parameters come from a user-level YAML file (or environment
//! variables for test rigs). The configuration is an explicit struct built
//! once at startup and passed by reference to the pool factory; there is
//! no process-wide singleton. A missing file or missing required key is a
//! fatal startup error naming the problem, never a per-query error.

use crate::error::{LimsError, LimsResult};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_postgres::NoTls;

/// Environment variable naming an explicit configuration file path.
pub const CONFIG_ENV: &str = "LIMSDB_CONFIG";

/// Configuration file name searched in the home directory, then the
/// working directory.
pub const CONFIG_FILE: &str = ".limsdbrc.yaml";

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub pool_size: usize,
    /// Wait limit when acquiring a pooled connection
    pub connect_timeout: Duration,
}

/// On-disk shape of the YAML file. All keys optional here so that missing
/// required keys can be reported by name instead of as a parse failure.
#[derive(Debug, Deserialize)]
struct RawDbConfig {
    username: Option<String>,
    password: Option<String>,
    host: Option<String>,
    database: Option<String>,
    port: Option<u16>,
    pool_size: Option<usize>,
    connect_timeout_secs: Option<u64>,
}

impl DbConfig {
    /// Load configuration from the first file found among
    /// `$LIMSDB_CONFIG`, `~/.limsdbrc.yaml`, `./.limsdbrc.yaml`.
    pub fn load() -> LimsResult<Self> {
        let searched = candidate_paths();
        for path in &searched {
            if path.is_file() {
                return Self::from_file(path);
            }
        }
        Err(LimsError::ConfigFileNotFound { searched })
    }

    /// Load configuration from a specific YAML file.
    ///
    /// Required keys: `username`, `host`, `database`. `password` defaults
    /// to empty, `port` to 5432.
    pub fn from_file(path: impl AsRef<Path>) -> LimsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LimsError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawDbConfig =
            serde_yaml::from_str(&text).map_err(|source| LimsError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        let missing = |key: &'static str| LimsError::MissingConfigKey {
            path: path.to_path_buf(),
            key,
        };

        Ok(Self {
            user: raw.username.ok_or_else(|| missing("username"))?,
            host: raw.host.ok_or_else(|| missing("host"))?,
            dbname: raw.database.ok_or_else(|| missing("database"))?,
            password: raw.password.unwrap_or_default(),
            port: raw.port.unwrap_or(5432),
            pool_size: raw.pool_size.unwrap_or(16),
            connect_timeout: Duration::from_secs(raw.connect_timeout_secs.unwrap_or(30)),
        })
    }

    /// Create a configuration from environment variables. Used by the
    /// DB-backed test suites; production callers load the file.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("LIMSDB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("LIMSDB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("LIMSDB_NAME").unwrap_or_else(|_| "clarity".to_string()),
            user: std::env::var("LIMSDB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("LIMSDB_PASSWORD").unwrap_or_default(),
            pool_size: std::env::var("LIMSDB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            connect_timeout: Duration::from_secs(
                std::env::var("LIMSDB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> LimsResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        let mut pool_cfg = PoolConfig::new(self.pool_size);
        pool_cfg.timeouts.wait = Some(self.connect_timeout);
        cfg.pool = Some(pool_cfg);

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
        Ok(pool)
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        paths.push(PathBuf::from(explicit));
    }
    if let Ok(home) = std::env::var("HOME") {
        paths.push(Path::new(&home).join(CONFIG_FILE));
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_complete_file() {
        let file = write_config(
            "username: limsuser\npassword: secret\nhost: db.example.org\ndatabase: clarity\nport: 5433\n",
        );
        let config = DbConfig::from_file(file.path()).unwrap();
        assert_eq!(config.user, "limsuser");
        assert_eq!(config.password, "secret");
        assert_eq!(config.host, "db.example.org");
        assert_eq!(config.dbname, "clarity");
        assert_eq!(config.port, 5433);
    }

    #[test]
    fn password_and_port_are_optional() {
        let file = write_config("username: limsuser\nhost: localhost\ndatabase: clarity\n");
        let config = DbConfig::from_file(file.path()).unwrap();
        assert_eq!(config.password, "");
        assert_eq!(config.port, 5432);
    }

    #[test]
    fn missing_host_key_is_named() {
        let file = write_config("username: limsuser\ndatabase: clarity\n");
        match DbConfig::from_file(file.path()) {
            Err(LimsError::MissingConfigKey { key, .. }) => assert_eq!(key, "host"),
            other => panic!("expected missing-key error, got {other:?}"),
        }
    }

    #[test]
    fn missing_username_key_is_named() {
        let file = write_config("host: localhost\ndatabase: clarity\n");
        match DbConfig::from_file(file.path()) {
            Err(LimsError::MissingConfigKey { key, .. }) => assert_eq!(key, "username"),
            other => panic!("expected missing-key error, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        match DbConfig::from_file("/nonexistent/.limsdbrc.yaml") {
            Err(LimsError::ConfigRead { .. }) => {}
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_yaml_is_a_parse_error() {
        let file = write_config(": not yaml ::\n\t-");
        match DbConfig::from_file(file.path()) {
            Err(LimsError::ConfigParse { .. }) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
