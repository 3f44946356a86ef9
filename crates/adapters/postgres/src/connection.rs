//! PostgreSQL 连接管理

use secrecy::{ExposeSecret, Secret};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;
use tracker_errors::AppError;

/// PostgreSQL 连接池配置
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub database: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// 语句级超时，作为 statement_timeout 下发给服务端
    pub statement_timeout: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: Secret::new(String::new()),
            database: "postgres".to_string(),
            min_connections: 10,
            max_connections: 20,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            statement_timeout: Duration::from_secs(60),
        }
    }
}

impl PostgresConfig {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: Secret<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password,
            database: database.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// 组装 sqlx 连接选项
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .database(&self.database)
            .options([(
                "statement_timeout",
                format!("{}s", self.statement_timeout.as_secs()),
            )])
    }
}

/// 连接失败分类
///
/// 调用方据此区分凭证错误与服务不可达，两者的处置不同
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid database credentials: {0}")]
    InvalidCredentials(String),

    #[error("Database connection refused: {0}")]
    Refused(String),

    #[error("Database connection failed: {0}")]
    Other(String),
}

impl ConnectError {
    fn classify(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // 28P01 invalid_password / 28000 invalid_authorization_specification
                Some("28P01") | Some("28000") => Self::InvalidCredentials(db_err.to_string()),
                _ => Self::Other(err.to_string()),
            },
            sqlx::Error::Io(io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionRefused =>
            {
                Self::Refused(err.to_string())
            }
            _ => Self::Other(err.to_string()),
        }
    }
}

impl From<ConnectError> for AppError {
    fn from(err: ConnectError) -> Self {
        AppError::database(err.to_string())
    }
}

/// 创建 PostgreSQL 连接池
///
/// 立即建立首个连接，启动阶段即可暴露凭证/网络问题
pub async fn create_pool(config: &PostgresConfig) -> Result<PgPool, ConnectError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(config.connect_options())
        .await
        .map_err(ConnectError::classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PostgresConfig::default();
        assert_eq!(config.min_connections, 10);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.statement_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_overrides() {
        let config = PostgresConfig::new(
            "db.internal",
            5433,
            "tracker",
            Secret::new("pw".to_string()),
            "tracker",
        )
        .with_max_connections(5)
        .with_min_connections(1)
        .with_statement_timeout(Duration::from_secs(10));

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5433);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.statement_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = PostgresConfig::new(
            "localhost",
            5432,
            "tracker",
            Secret::new("hunter2".to_string()),
            "tracker",
        );
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("hunter2"));
    }
}
