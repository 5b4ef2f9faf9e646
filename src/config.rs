//! Runtime configuration for the migrator web server.
//!
//! Values come from the environment (optionally via a `.env` file loaded by
//! the binary) and can be overridden by command-line flags.

use std::path::PathBuf;

use crate::error::{MigratorError, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional ruleset layout replacing the built-in one
    pub template_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            template_path: None,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `RULE_TEMPLATE` from the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| MigratorError::Config(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(path) = lookup("RULE_TEMPLATE").filter(|p| !p.is_empty()) {
            config.template_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        template_path: Option<PathBuf>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if template_path.is_some() {
            self.template_path = template_path;
        }
        self
    }

    /// `host:port` string to bind; host names are resolved by the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
