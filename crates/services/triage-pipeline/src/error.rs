//! Pipeline errors.

use std::fmt;

use common::AppError;
use thiserror::Error;

/// Remote call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcribe,
    Generate,
    Synthesize,
    Chat,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Transcribe => "speech-to-text",
            Stage::Generate => "language model",
            Stage::Synthesize => "text-to-speech",
            Stage::Chat => "chat",
        };
        f.write_str(name)
    }
}

/// Errors raised while calling the inference endpoints.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} service returned {status}: {body}")]
    Rejected {
        stage: Stage,
        status: u16,
        body: String,
    },

    #[error("{stage} service returned an unexpected response: {reason}")]
    Malformed { stage: Stage, reason: String },

    #[error("failed to store uploaded audio: {0}")]
    Audio(#[from] std::io::Error),

    #[error("chat endpoint reported an error: {0}")]
    Chat(String),

    #[error("invalid HTTP client configuration: {0}")]
    Client(#[source] reqwest::Error),
}

impl PipelineError {
    pub fn malformed(stage: Stage, reason: impl Into<String>) -> Self {
        PipelineError::Malformed {
            stage,
            reason: reason.into(),
        }
    }

    /// Stage that failed, if the failure came from a remote call.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Transport { stage, .. }
            | PipelineError::Rejected { stage, .. }
            | PipelineError::Malformed { stage, .. } => Some(*stage),
            PipelineError::Chat(_) => Some(Stage::Chat),
            PipelineError::Audio(_) | PipelineError::Client(_) => None,
        }
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Audio(e) => AppError::internal(format!("audio storage: {}", e)),
            PipelineError::Client(e) => AppError::internal(format!("http client: {}", e)),
            other => AppError::upstream(other.to_string()),
        }
    }
}
