//! Triage input mode and speech output language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How the user submits a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum InputMode {
    #[default]
    Text,
    Audio,
}

impl InputMode {
    pub const ALL: [InputMode; 2] = [InputMode::Text, InputMode::Audio];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Text => "Text",
            InputMode::Audio => "Audio",
        }
    }
}

impl FromStr for InputMode {
    type Err = DomainError;

    /// Case-insensitive, so CLI flags like `--mode audio` parse too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(InputMode::Text),
            "audio" => Ok(InputMode::Audio),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the synthesized spoken response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SpeechLanguage {
    #[default]
    Yoruba,
    Hausa,
}

impl SpeechLanguage {
    pub const ALL: [SpeechLanguage; 2] = [SpeechLanguage::Yoruba, SpeechLanguage::Hausa];

    /// Wire value expected by the speech synthesizer
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeechLanguage::Yoruba => "yoruba",
            SpeechLanguage::Hausa => "hausa",
        }
    }
}

impl FromStr for SpeechLanguage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yoruba" => Ok(SpeechLanguage::Yoruba),
            "hausa" => Ok(SpeechLanguage::Hausa),
            _ => Err(DomainError::InvalidLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for SpeechLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
