//! Server bind settings
//!
//! Loaded with the `config` crate from the `HOST` and `PORT` environment
//! variables, falling back to per-service defaults.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Address a service listens on
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load bind settings, defaulting to `0.0.0.0:<default_port>`
    pub fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", default_port)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// `host:port`, ready for `TcpListener::bind`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        unsafe {
            std::env::remove_var("HOST");
            std::env::remove_var("PORT");
        }

        let config = ServerConfig::from_env(3001).unwrap();
        assert_eq!(config.address(), "0.0.0.0:3001");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        unsafe {
            std::env::set_var("HOST", "127.0.0.1");
            std::env::set_var("PORT", "8080");
        }

        let config = ServerConfig::from_env(3000).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);

        unsafe {
            std::env::remove_var("HOST");
            std::env::remove_var("PORT");
        }
    }
}
