use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ServiceError, ServiceResult};

/// Service configuration, fixed at startup.
///
/// Sources, lowest precedence first: an optional `config` file, `TOOLBOX__*`
/// environment variables, then the conventional unprefixed `PORT`,
/// `DATABASE_URL` and `DATABASE_NAME` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database location. Unset means an in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Logical database name reported by diagnostics
    #[serde(default)]
    pub database_name: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from file and process environment
    pub fn load() -> ServiceResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration, resolving unprefixed variables through `lookup`
    fn load_with(lookup: impl Fn(&str) -> Option<String>) -> ServiceResult<Self> {
        let mut config: ServiceConfig = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("TOOLBOX")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("port", lookup("PORT"))
            .and_then(|b| b.set_override_option("database_url", lookup("DATABASE_URL")))
            .and_then(|b| b.set_override_option("database_name", lookup("DATABASE_NAME")))
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to apply environment overrides: {}", e),
            })?
            .build()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to build config: {}", e),
            })?
            .try_deserialize()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to deserialize config: {}", e),
            })?;

        // An empty variable counts as unset
        config.database_url = config.database_url.filter(|v| !v.is_empty());
        config.database_name = config.database_name.filter(|v| !v.is_empty());

        Ok(config)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::load_with(|_| None).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.database_url.is_none());
        assert!(config.database_name.is_none());
    }

    #[test]
    fn test_unprefixed_variables() {
        let config = ServiceConfig::load_with(|key| match key {
            "PORT" => Some("9100".to_string()),
            "DATABASE_URL" => Some("sqlite://toolbox.db".to_string()),
            "DATABASE_NAME" => Some("toolbox".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.database_url.as_deref(), Some("sqlite://toolbox.db"));
        assert_eq!(config.database_name.as_deref(), Some("toolbox"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ServiceConfig::load_with(|key| match key {
            "DATABASE_URL" | "DATABASE_NAME" => Some(String::new()),
            _ => None,
        })
        .unwrap();

        assert!(config.database_url.is_none());
        assert!(config.database_name.is_none());
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = ServiceConfig::load_with(|key| match key {
            "PORT" => Some("not-a-port".to_string()),
            _ => None,
        })
        .unwrap_err();

        assert!(matches!(err, ServiceError::Config { .. }));
    }
}
