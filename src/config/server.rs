//! HTTP listener, logging and CORS settings.

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Listener settings. Every field has a default, so the section may be omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// Log filter directive, overridden by `RUST_LOG`
    pub log_level: String,

    /// Log output; follows the environment when unset
    pub log_format: Option<LogFormat>,

    pub request_timeout_secs: u64,

    /// Comma-separated browser origins allowed to call the API
    pub cors_origins: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Which origins the CORS layer admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin; only used outside production when no list is configured.
    AnyOrigin,
    /// Exactly these origins. Empty admits none.
    Origins(Vec<String>),
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidSocketAddr(raw))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// JSON lines in production, human-readable otherwise, unless set explicitly.
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or(if self.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        })
    }

    pub fn cors_policy(&self) -> CorsPolicy {
        let origins: Vec<String> = self
            .cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() && !self.is_production() {
            CorsPolicy::AnyOrigin
        } else {
            CorsPolicy::Origins(origins)
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,campaign_board=debug,sqlx=warn".to_string(),
            log_format: None,
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> ServerConfig {
        ServerConfig {
            environment: Environment::Production,
            ..Default::default()
        }
    }

    #[test]
    fn defaults_bind_all_interfaces_on_8080() {
        let config = ServerConfig::default();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparseable_host_fails_validation() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSocketAddr(_))
        ));
    }

    #[test]
    fn port_and_timeout_bounds_are_checked() {
        let zero_port = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(zero_port.validate(), Err(ValidationError::InvalidPort)));

        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
        }
    }

    #[test]
    fn log_format_follows_environment_unless_set() {
        assert_eq!(ServerConfig::default().log_format(), LogFormat::Pretty);
        assert_eq!(production().log_format(), LogFormat::Json);

        let explicit = ServerConfig {
            log_format: Some(LogFormat::Pretty),
            ..production()
        };
        assert_eq!(explicit.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn cors_is_open_only_in_development_without_a_list() {
        assert_eq!(ServerConfig::default().cors_policy(), CorsPolicy::AnyOrigin);
        assert_eq!(production().cors_policy(), CorsPolicy::Origins(vec![]));
    }

    #[test]
    fn cors_list_skips_blank_entries() {
        let config = ServerConfig {
            cors_origins: Some("https://board.example.org, ,https://admin.example.org,".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.cors_policy(),
            CorsPolicy::Origins(vec![
                "https://board.example.org".to_string(),
                "https://admin.example.org".to_string(),
            ])
        );
    }
}
