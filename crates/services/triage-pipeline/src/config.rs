//! Pipeline configuration.

use std::time::Duration;

use common::{optional_var, require_var, timeout_var, ConfigError, ServiceConfig};

use crate::chat::space_url;

/// Default demo server port
pub const DEFAULT_DEMO_PORT: u16 = 7860;

/// Default timeout for each inference call in seconds
pub const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 120;

/// Space hosting the chat endpoint
pub const DEFAULT_CHAT_SPACE: &str = "ayscript/health_atlas";

/// Path prefix of the Gradio REST API
pub const DEFAULT_CHAT_API_PREFIX: &str = "/gradio_api";

/// Named endpoint of the chat app
pub const DEFAULT_CHAT_API_NAME: &str = "/chat";

/// Inference endpoint configuration.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Speech-to-text endpoint URL
    pub asr_url: String,
    /// Language model endpoint URL
    pub llm_url: String,
    /// Text-to-speech endpoint URL
    pub tts_url: String,
    /// Timeout for each call
    pub timeout: Duration,
}

impl InferenceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            asr_url: require_var("ASR_URL")?,
            llm_url: require_var("LLM_URL")?,
            tts_url: require_var("TTS_URL")?,
            timeout: timeout_var("INFERENCE_TIMEOUT_SECS", DEFAULT_INFERENCE_TIMEOUT_SECS)?,
        })
    }
}

/// Chat endpoint configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Root URL of the Space
    pub base_url: String,
    /// Gradio REST API prefix
    pub api_prefix: String,
    pub timeout: Duration,
}

impl ChatConfig {
    /// Load configuration from environment variables.
    ///
    /// `CHAT_SPACE_URL` wins over the URL derived from `CHAT_SPACE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = optional_var("CHAT_SPACE_URL").unwrap_or_else(|| {
            space_url(&optional_var("CHAT_SPACE").unwrap_or_else(|| DEFAULT_CHAT_SPACE.to_string()))
        });

        Ok(Self {
            base_url,
            api_prefix: optional_var("CHAT_API_PREFIX")
                .unwrap_or_else(|| DEFAULT_CHAT_API_PREFIX.to_string()),
            timeout: timeout_var("INFERENCE_TIMEOUT_SECS", DEFAULT_INFERENCE_TIMEOUT_SECS)?,
        })
    }
}

/// Demo server configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub inference: InferenceConfig,
    /// Bind address from `DEMO_HOST` and `DEMO_PORT`
    pub server: ServiceConfig,
}

impl DemoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            inference: InferenceConfig::from_env()?,
            server: ServiceConfig::from_env("DEMO", DEFAULT_DEMO_PORT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the endpoint variables so parallel tests cannot race on them.
    #[test]
    fn test_demo_config_from_environment() {
        std::env::remove_var("ASR_URL");
        assert_eq!(
            DemoConfig::from_env().unwrap_err(),
            ConfigError::Missing("ASR_URL")
        );

        std::env::set_var("ASR_URL", "http://asr.test/api/predict");
        std::env::set_var("LLM_URL", "http://llm.test/api/predict");
        std::env::set_var("TTS_URL", "http://tts.test/api/predict");
        std::env::set_var("DEMO_PORT", "7999");

        let config = DemoConfig::from_env().unwrap();
        assert_eq!(config.server.port, 7999);
        assert_eq!(config.inference.tts_url, "http://tts.test/api/predict");
    }
}
