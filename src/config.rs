//! Configuration management for the Biblioteca server

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::{env, time::Duration};

const DEFAULT_CONFIG_FILE: &str = "config/server.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for every non-API path
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Set to false to skip the connection attempt and run in memory
    pub enabled: bool,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Upper bound for a single backend call
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the optional config file and environment variables.
    ///
    /// Precedence, lowest first: built-in defaults, `config/server.toml`
    /// (or the file named by `BIBLIOTECA_CONFIG`), `BIBLIOTECA__*` variables,
    /// then the legacy `DB_NAME`/`DB_HOST`/`DB_USER`/`DB_PASS` and `DATABASE_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("BIBLIOTECA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        let config = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("BIBLIOTECA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.name", env::var("DB_NAME").ok())?
            .set_override_option("database.host", env::var("DB_HOST").ok())?
            .set_override_option("database.user", env::var("DB_USER").ok())?
            .set_override_option("database.password", env::var("DB_PASS").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize an already assembled configuration, filling gaps with defaults
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Connection URL for the Postgres backend
    pub fn url(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: "web".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "school".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            user: "root".to_string(),
            password: "abc123".to_string(),
            url: None,
            max_connections: 5,
            connect_timeout_secs: 3,
            timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
