//! Application configuration module
//!
//! Configuration is read from environment variables with the `CAMPAIGN_BOARD`
//! prefix; nested values use a double underscore as separator.
//!
//! # Example
//!
//! ```no_run
//! use campaign_board::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod error;
mod server;
mod service;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{CorsPolicy, Environment, LogFormat, ServerConfig};
pub use service::{BoardConfig, DirectoryConfig, NotificationConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL storage; in-memory storage when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads `CAMPAIGN_BOARD__*` variables:
    ///
    /// - `CAMPAIGN_BOARD__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CAMPAIGN_BOARD__DATABASE__URL=...` -> `database.url = ...`
    /// - `CAMPAIGN_BOARD__BOARD__MAX_LIMIT=100` -> `board.max_limit = 100`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAMPAIGN_BOARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.notifications.validate()?;
        self.board.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CAMPAIGN_BOARD__SERVER__PORT",
        "CAMPAIGN_BOARD__SERVER__ENVIRONMENT",
        "CAMPAIGN_BOARD__DATABASE__URL",
        "CAMPAIGN_BOARD__BOARD__DEFAULT_LIMIT",
        "CAMPAIGN_BOARD__NOTIFICATIONS__QUEUE_CAPACITY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.notifications.queue_capacity, 1024);
        assert_eq!(config.board.default_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_section_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CAMPAIGN_BOARD__DATABASE__URL", "postgresql://board@localhost/board");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgresql://board@localhost/board");
        assert_eq!(database.max_connections, 10);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CAMPAIGN_BOARD__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CAMPAIGN_BOARD__SERVER__PORT", "3000");
        env::set_var("CAMPAIGN_BOARD__BOARD__DEFAULT_LIMIT", "25");
        env::set_var("CAMPAIGN_BOARD__NOTIFICATIONS__QUEUE_CAPACITY", "16");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.board.default_limit, 25);
        assert_eq!(config.notifications.queue_capacity, 16);
    }

    #[test]
    fn test_validate_rejects_bad_database() {
        let config = AppConfig {
            database: Some(DatabaseConfig {
                url: "sqlite://board.db".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidDatabaseUrl)));
    }
}
