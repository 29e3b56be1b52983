//! Domain-level constants.
//!
//! Fixed messages and defaults that callers of the API and the demo can
//! observe.

// =============================================================================
// Authentication
// =============================================================================

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// User metadata key holding the display name
pub const METADATA_DISPLAY_NAME: &str = "display_name";

/// Display name reported when the user metadata has none
pub const DEFAULT_DISPLAY_NAME: &str = "No Display Name Set";

// =============================================================================
// Triage
// =============================================================================

/// Prompt returned when text mode receives blank input
pub const PROMPT_ENTER_TEXT: &str = "Please enter text";

/// Prompt returned when audio mode receives no recording
pub const PROMPT_UPLOAD_AUDIO: &str = "Please upload audio";

/// File suffix used when persisting an uploaded recording
pub const AUDIO_FILE_SUFFIX: &str = ".wav";

/// Languages the assistant understands (speech output supports a subset)
pub const ASSISTANT_LANGUAGES: &[&str] = &["English", "Yoruba", "Hausa", "Igbo"];

// =============================================================================
// Chat
// =============================================================================

/// Default system prompt for the chat endpoint
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a friendly Chatbot.";

/// Default token budget for a chat completion
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default nucleus sampling threshold
pub const DEFAULT_TOP_P: f64 = 0.95;
