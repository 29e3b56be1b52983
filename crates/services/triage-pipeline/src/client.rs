//! Inference endpoint clients.
//!
//! Each endpoint is a Gradio app answering `POST {"data": [...]}` with
//! `{"data": [result, ...]}`.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use domain::SpeechLanguage;

use crate::config::InferenceConfig;
use crate::error::{PipelineError, PipelineResult, Stage};

#[cfg(test)]
use mockall::automock;

/// The three remote models the pipeline chains.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Speech-to-text for a recording on disk
    async fn transcribe(&self, audio_path: &Path) -> PipelineResult<String>;

    /// Language model answer for a prompt
    async fn generate(&self, prompt: &str) -> PipelineResult<String>;

    /// Text-to-speech; returns a reference to the produced audio
    async fn synthesize(&self, text: &str, language: SpeechLanguage) -> PipelineResult<String>;
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    data: Vec<Value>,
}

/// HTTP client for Gradio-hosted inference endpoints.
pub struct GradioInference {
    http: Client,
    asr_url: String,
    llm_url: String,
    tts_url: String,
}

impl GradioInference {
    /// Create a new inference client.
    pub fn new(config: &InferenceConfig) -> PipelineResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PipelineError::Client)?;

        Ok(Self {
            http,
            asr_url: config.asr_url.clone(),
            llm_url: config.llm_url.clone(),
            tts_url: config.tts_url.clone(),
        })
    }

    /// Post one prediction and return the first output.
    async fn predict(&self, stage: Stage, url: &str, data: Vec<Value>) -> PipelineResult<Value> {
        debug!("Calling {} endpoint at {}", stage, url);

        let response = self
            .http
            .post(url)
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|source| PipelineError::Transport { stage, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| PipelineError::Transport { stage, source })?;

        if !status.is_success() {
            return Err(PipelineError::Rejected {
                stage,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictResponse = serde_json::from_str(&body)
            .map_err(|e| PipelineError::malformed(stage, e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::malformed(stage, "empty data array"))
    }
}

fn expect_text(stage: Stage, value: Value) -> PipelineResult<String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(PipelineError::malformed(
            stage,
            format!("expected text, got {}", other),
        )),
    }
}

/// Audio outputs arrive either as a bare path or as a file object.
fn audio_reference(value: Value) -> PipelineResult<String> {
    match value {
        Value::String(reference) => Ok(reference),
        Value::Object(file) => ["url", "path"]
            .iter()
            .find_map(|key| file.get(*key).and_then(Value::as_str).map(str::to_string))
            .ok_or_else(|| {
                PipelineError::malformed(Stage::Synthesize, "audio object without url or path")
            }),
        other => Err(PipelineError::malformed(
            Stage::Synthesize,
            format!("expected audio, got {}", other),
        )),
    }
}

#[async_trait]
impl InferenceBackend for GradioInference {
    async fn transcribe(&self, audio_path: &Path) -> PipelineResult<String> {
        let data = vec![json!(audio_path.to_string_lossy())];
        let value = self.predict(Stage::Transcribe, &self.asr_url, data).await?;
        expect_text(Stage::Transcribe, value)
    }

    async fn generate(&self, prompt: &str) -> PipelineResult<String> {
        let value = self
            .predict(Stage::Generate, &self.llm_url, vec![json!(prompt)])
            .await?;
        expect_text(Stage::Generate, value)
    }

    async fn synthesize(&self, text: &str, language: SpeechLanguage) -> PipelineResult<String> {
        let data = vec![json!(text), json!(language.as_str())];
        let value = self.predict(Stage::Synthesize, &self.tts_url, data).await?;
        audio_reference(value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GradioInference {
        GradioInference::new(&InferenceConfig {
            asr_url: format!("{}/asr/api/predict", server.uri()),
            llm_url: format!("{}/llm/api/predict", server.uri()),
            tts_url: format!("{}/tts/api/predict", server.uri()),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_posts_prompt_and_reads_first_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/llm/api/predict"))
            .and(body_json(json!({ "data": ["I have a headache"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": ["Drink water and rest.", "ignored"],
                "duration": 1.2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server).generate("I have a headache").await.unwrap();
        assert_eq!(answer, "Drink water and rest.");
    }

    #[tokio::test]
    async fn test_synthesize_sends_language_and_accepts_file_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tts/api/predict"))
            .and(body_json(json!({ "data": ["Mu omi", "yoruba"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "path": "/tmp/gradio/out.wav",
                    "url": "https://tts.example/file=/tmp/gradio/out.wav"
                }]
            })))
            .mount(&server)
            .await;

        let audio = client(&server)
            .synthesize("Mu omi", SpeechLanguage::Yoruba)
            .await
            .unwrap();
        assert_eq!(audio, "https://tts.example/file=/tmp/gradio/out.wav");
    }

    #[tokio::test]
    async fn test_transcribe_sends_audio_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/asr/api/predict"))
            .and(body_json(json!({ "data": ["/tmp/healthatlas-1.wav"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ["ori n fo mi"] })))
            .mount(&server)
            .await;

        let transcript = client(&server)
            .transcribe(Path::new("/tmp/healthatlas-1.wav"))
            .await
            .unwrap();
        assert_eq!(transcript, "ori n fo mi");
    }

    #[tokio::test]
    async fn test_error_status_names_the_stage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/llm/api/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_string("queue full"))
            .mount(&server)
            .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Rejected { stage: Stage::Generate, status: 500, .. }
        ));
        assert_eq!(err.to_string(), "language model service returned 500: queue full");
    }

    #[tokio::test]
    async fn test_empty_data_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/llm/api/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = client(&server).generate("hello").await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Generate));
        assert!(matches!(err, PipelineError::Malformed { .. }));
    }

    #[test]
    fn test_audio_reference_prefers_url_then_path() {
        assert_eq!(
            audio_reference(json!({ "path": "/tmp/a.wav" })).unwrap(),
            "/tmp/a.wav"
        );
        assert!(audio_reference(json!(42)).is_err());
        assert!(audio_reference(json!({ "size": 10 })).is_err());
    }
}
