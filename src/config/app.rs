//! Application configuration loading from config.toml
//!
//! The file provides server, database and token settings plus the list of
//! administrators to bootstrap on first start. `DATABASE_URL` and `JWT_SECRET`
//! from the environment (or `.env`) override the file.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_VAR: &str = "EXCHANGE_DESK_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Bearer token settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Administrators created at startup when missing
    #[serde(default)]
    pub admins: Vec<BootstrapAdmin>,
}

/// Where the HTTP server listens
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `SeaORM` connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Bearer token settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens
    #[serde(default)]
    pub jwt_secret: String,
    /// Lifetime of issued tokens in seconds (default: 43200 = 12 hours)
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: default_token_lifetime(),
        }
    }
}

/// Administrator seeded at startup
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    /// Display name
    pub name: String,
    /// Login e-mail
    pub email: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

const fn default_token_lifetime() -> u64 {
    43_200
}

impl AppConfig {
    /// Applies `DATABASE_URL` and `JWT_SECRET` from the environment, if set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        self
    }

    /// Checks the settings that have no usable default.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(Error::Config {
                message: "auth.jwt_secret (or JWT_SECRET) must be set".to_string(),
            });
        }
        if self.auth.token_lifetime_secs == 0 {
            return Err(Error::Config {
                message: "auth.token_lifetime_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file, applies environment overrides and validates it.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - No token secret is configured
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    let config = parse_config(&contents)?.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Loads configuration from `$EXCHANGE_DESK_CONFIG`, or ./config.toml when unset.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "sqlite::memory:"

            [auth]
            jwt_secret = "secret"
            token_lifetime_secs = 60

            [[admins]]
            name = "Root"
            email = "root@example.com"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.auth.token_lifetime_secs, 60);
        assert_eq!(config.admins.len(), 1);
        assert_eq!(config.admins[0].email, "root@example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply_to_missing_sections() {
        let config = parse_config("[auth]\njwt_secret = \"s\"\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.auth.token_lifetime_secs, 43_200);
        assert!(config.admins.is_empty());
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let config = parse_config("").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("[server\nport = 1");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("/definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
