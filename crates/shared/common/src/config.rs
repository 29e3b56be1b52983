//! Shared configuration structures and environment helpers.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors raised at process start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value '{value}'")]
    Invalid { name: String, value: String },
}

/// Bind address of an HTTP service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl ServiceConfig {
    /// Read `<PREFIX>_HOST` and `<PREFIX>_PORT`, falling back to the given port.
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        let host = optional_var(&format!("{prefix}_HOST")).unwrap_or_else(|| "0.0.0.0".to_string());
        let port_var = format!("{prefix}_PORT");
        let port = match optional_var(&port_var) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: port_var,
                value,
            })?,
            None => default_port,
        };

        Ok(Self { host, port })
    }

    /// Apply command line overrides on top of the environment.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Get the full bind address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read a variable that must be present and non-empty.
pub fn require_var(name: &'static str) -> Result<String, ConfigError> {
    optional_var(name).ok_or(ConfigError::Missing(name))
}

/// Read a variable, treating an empty value as absent.
pub fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read and parse a variable, using `default` when absent.
pub fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

/// Read a timeout expressed in whole seconds.
pub fn timeout_var(name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    parse_var(name, default_secs).map(Duration::from_secs)
}
