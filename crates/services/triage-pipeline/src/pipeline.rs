//! Triage pipeline: speech-to-text, language model, text-to-speech.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use domain::{InputMode, SpeechLanguage, PROMPT_ENTER_TEXT, PROMPT_UPLOAD_AUDIO};

use crate::audio::AudioClip;
use crate::client::InferenceBackend;
use crate::error::PipelineResult;

/// A single user query.
#[derive(Debug, Clone, Default)]
pub struct TriageRequest {
    pub mode: InputMode,
    pub text: Option<String>,
    pub audio: Option<AudioClip>,
    pub language: SpeechLanguage,
}

impl TriageRequest {
    pub fn text(text: impl Into<String>, language: SpeechLanguage) -> Self {
        Self {
            mode: InputMode::Text,
            text: Some(text.into()),
            audio: None,
            language,
        }
    }

    pub fn audio(clip: AudioClip, language: SpeechLanguage) -> Self {
        Self {
            mode: InputMode::Audio,
            text: None,
            audio: Some(clip),
            language,
        }
    }
}

/// Model answer plus a reference to its spoken rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageOutcome {
    pub response: String,
    pub audio: Option<String>,
}

impl TriageOutcome {
    fn prompt(message: &str) -> Self {
        Self {
            response: message.to_string(),
            audio: None,
        }
    }
}

/// Chains the inference stages for one query at a time.
pub struct TriagePipeline {
    backend: Arc<dyn InferenceBackend>,
}

impl TriagePipeline {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Run a query through the pipeline.
    ///
    /// Missing input short-circuits with a prompt and calls nothing. Any
    /// stage failure aborts the run.
    #[instrument(skip(self, request), fields(mode = %request.mode, language = %request.language))]
    pub async fn run(&self, request: TriageRequest) -> PipelineResult<TriageOutcome> {
        match request.mode {
            InputMode::Text => {
                let text = request.text.unwrap_or_default();
                if text.trim().is_empty() {
                    return Ok(TriageOutcome::prompt(PROMPT_ENTER_TEXT));
                }
                self.answer(&text, request.language).await
            }
            InputMode::Audio => {
                let clip = match request.audio {
                    Some(clip) if !clip.is_empty() => clip,
                    _ => return Ok(TriageOutcome::prompt(PROMPT_UPLOAD_AUDIO)),
                };

                info!("Transcribing {} bytes of audio", clip.len());
                // Dropping the handle at the end of this arm deletes the file.
                let recording = clip.persist().await?;
                let transcript = self.backend.transcribe(recording.path()).await?;
                self.answer(&transcript, request.language).await
            }
        }
    }

    async fn answer(&self, prompt: &str, language: SpeechLanguage) -> PipelineResult<TriageOutcome> {
        info!("Generating response");
        let response = self.backend.generate(prompt).await?;

        info!("Synthesizing speech");
        let audio = self.backend.synthesize(&response, language).await?;

        Ok(TriageOutcome {
            response,
            audio: Some(audio),
        })
    }
}
