//! Gateway configuration.

use std::time::Duration;

use common::{optional_var, require_var, timeout_var, ConfigError, ServiceConfig};

/// Default gateway port
pub const DEFAULT_GATEWAY_PORT: u16 = 8000;

/// Default timeout for identity provider calls in seconds
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 30;

/// Gateway configuration.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Identity provider project URL
    pub supabase_url: String,
    /// Identity provider public (anon) key
    supabase_anon_key: String,
    /// Where confirmation links in signup e-mails point to
    pub signup_redirect_url: Option<String>,
    /// Where password reset links point to
    pub password_reset_redirect_url: Option<String>,
    /// Timeout for each identity provider call
    pub identity_timeout: Duration,
    /// Bind address
    pub server: ServiceConfig,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"[REDACTED]")
            .field("signup_redirect_url", &self.signup_redirect_url)
            .field("password_reset_redirect_url", &self.password_reset_redirect_url)
            .field("identity_timeout", &self.identity_timeout)
            .field("server", &self.server)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            supabase_url: require_var("SUPABASE_URL")?,
            supabase_anon_key: require_var("SUPABASE_ANON_KEY")?,
            signup_redirect_url: optional_var("SIGNUP_REDIRECT_URL"),
            password_reset_redirect_url: optional_var("PASSWORD_RESET_REDIRECT_URL"),
            identity_timeout: timeout_var("IDENTITY_TIMEOUT_SECS", DEFAULT_IDENTITY_TIMEOUT_SECS)?,
            server: ServiceConfig::from_env("GATEWAY", DEFAULT_GATEWAY_PORT)?,
        })
    }

    /// Build a configuration for a given provider, with defaults elsewhere.
    pub fn new(supabase_url: impl Into<String>, supabase_anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            supabase_anon_key: supabase_anon_key.into(),
            signup_redirect_url: None,
            password_reset_redirect_url: None,
            identity_timeout: Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS),
            server: ServiceConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_GATEWAY_PORT,
            },
        }
    }

    /// Identity provider public key.
    pub fn supabase_anon_key(&self) -> &str {
        &self.supabase_anon_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_anon_key() {
        let config = GatewayConfig::new("https://project.supabase.co", "super-secret-anon-key");
        let rendered = format!("{:?}", config);

        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret-anon-key"));
    }

    #[test]
    fn test_bind_address_comes_from_environment() {
        std::env::set_var("SUPABASE_URL", "https://project.supabase.co");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
        std::env::set_var("GATEWAY_HOST", "127.0.0.1");
        std::env::set_var("GATEWAY_PORT", "8123");

        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.server.addr(), "127.0.0.1:8123");
    }
}
