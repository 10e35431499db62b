//! # Configuration
//!
//! Command-line flags with environment-variable fallbacks, parsed by `clap`
//! and then checked into an [`AppConfig`].
//!
//! | Flag                          | Env                         | Default   |
//! |-------------------------------|-----------------------------|-----------|
//! | `--host`                      | `HOST`                      | `0.0.0.0` |
//! | `--port`                      | `PORT`                      | `8080`    |
//! | `--database-url`              | `DATABASE_URL`              | unset     |
//! | `--db-max-connections`        | `DB_MAX_CONNECTIONS`        | `10`      |
//! | `--db-min-connections`        | `DB_MIN_CONNECTIONS`        | `1`       |
//! | `--db-acquire-timeout-secs`   | `DB_ACQUIRE_TIMEOUT_SECS`   | `5`       |
//! | `--metrics`                   | `CARDVAULT_METRICS_ENABLED` | `true`    |
//! | `--log-format`                | `LOG_FORMAT`                | `text`    |
//!
//! Without a database URL the service keeps records in memory and loses
//! them on restart.

use std::net::{IpAddr, SocketAddr};

use clap::{ArgAction, Parser, ValueEnum};
use thiserror::Error;

/// Errors raised while turning CLI/environment input into an [`AppConfig`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `DATABASE_URL` was set but empty.
    #[error("database URL must not be empty")]
    EmptyDatabaseUrl,

    /// The pool cannot hold any connection.
    #[error("db max connections must be at least 1")]
    ZeroMaxConnections,

    /// Minimum pool size exceeds the maximum.
    #[error("db min connections ({min}) exceeds max connections ({max})")]
    PoolBounds { min: u32, max: u32 },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Raw command-line interface.
#[derive(Parser)]
#[command(name = "cardvault-api", version, about = "Card number validation and storage service")]
pub struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to bind the HTTP server to.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// MySQL connection URL. Records are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Minimum number of pooled database connections.
    #[arg(long, env = "DB_MIN_CONNECTIONS", default_value_t = 1)]
    pub db_min_connections: u32,

    /// Seconds to wait when acquiring a pooled connection.
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 5)]
    pub db_acquire_timeout_secs: u64,

    /// Record Prometheus metrics and serve them at `/metrics`.
    #[arg(
        long,
        env = "CARDVAULT_METRICS_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub metrics: bool,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Check the parsed flags and build the runtime configuration.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let database = match self.database_url {
            None => None,
            Some(url) if url.trim().is_empty() => return Err(ConfigError::EmptyDatabaseUrl),
            Some(url) => {
                if self.db_max_connections == 0 {
                    return Err(ConfigError::ZeroMaxConnections);
                }
                if self.db_min_connections > self.db_max_connections {
                    return Err(ConfigError::PoolBounds {
                        min: self.db_min_connections,
                        max: self.db_max_connections,
                    });
                }
                Some(DatabaseConfig {
                    url,
                    max_connections: self.db_max_connections,
                    min_connections: self.db_min_connections,
                    acquire_timeout_secs: self.db_acquire_timeout_secs,
                })
            }
        };

        Ok(AppConfig {
            bind: SocketAddr::new(self.host, self.port),
            database,
            metrics_enabled: self.metrics,
            log_format: self.log_format,
        })
    }
}

/// Runtime configuration for the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind: SocketAddr,
    /// MySQL settings; `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Whether Prometheus metrics are recorded and served.
    pub metrics_enabled: bool,
    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database: None,
            metrics_enabled: true,
            log_format: LogFormat::Text,
        }
    }
}

/// MySQL pool settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Connection URL, including credentials.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Minimum number of pooled connections.
    pub min_connections: u32,
    /// Pool acquire timeout in seconds.
    pub acquire_timeout_secs: u64,
}

// The URL carries credentials.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}
