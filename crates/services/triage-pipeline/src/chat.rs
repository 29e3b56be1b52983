//! Client for a chat endpoint hosted on a Hugging Face Space.
//!
//! Uses the two-step Gradio call API: a `POST` that queues the job and
//! returns an event id, then a `GET` that streams server-sent events
//! until the job completes.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use domain::{DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};

use crate::config::{ChatConfig, DEFAULT_CHAT_API_NAME};
use crate::error::{PipelineError, PipelineResult, Stage};

/// Inputs of the chat endpoint, in call order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub system_message: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    fn payload(&self) -> Value {
        json!({
            "data": [
                self.message,
                self.system_message,
                self.max_tokens,
                self.temperature,
                self.top_p,
            ]
        })
    }
}

/// Resolve a Space id such as `owner/name` to its hosted URL.
pub fn space_url(space: &str) -> String {
    let host: String = space
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '/' | '_' | '.' => '-',
            other => other,
        })
        .collect();
    format!("https://{}.hf.space", host)
}

#[derive(Debug, Deserialize)]
struct QueuedCall {
    event_id: String,
}

/// Gradio call API client.
pub struct ChatClient {
    http: Client,
    base_url: String,
    api_prefix: String,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> PipelineResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PipelineError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_prefix: format!("/{}", config.api_prefix.trim_matches('/')),
        })
    }

    fn call_url(&self, api_name: &str) -> String {
        format!(
            "{}{}/call/{}",
            self.base_url,
            self.api_prefix,
            api_name.trim_start_matches('/')
        )
    }

    /// Send a message to the default `/chat` endpoint.
    pub async fn chat(&self, request: &ChatRequest) -> PipelineResult<Value> {
        self.predict(DEFAULT_CHAT_API_NAME, request).await
    }

    /// Queue a call on a named endpoint and wait for its result.
    pub async fn predict(&self, api_name: &str, request: &ChatRequest) -> PipelineResult<Value> {
        let url = self.call_url(api_name);
        info!("Queueing chat call on {}", url);

        let queued: QueuedCall = self
            .send(self.http.post(&url).json(&request.payload()))
            .await
            .and_then(|body| {
                serde_json::from_str(&body)
                    .map_err(|e| PipelineError::malformed(Stage::Chat, e.to_string()))
            })?;

        debug!("Streaming result for event {}", queued.event_id);
        let stream = self
            .send(self.http.get(format!("{}/{}", url, queued.event_id)))
            .await?;

        parse_event_stream(&stream)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> PipelineResult<String> {
        let transport = |source| PipelineError::Transport {
            stage: Stage::Chat,
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(PipelineError::Rejected {
                stage: Stage::Chat,
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Extract the result from a Gradio server-sent-event body.
///
/// The `complete` event wins; otherwise the last `generating` payload is
/// used. An `error` event fails the call.
pub fn parse_event_stream(body: &str) -> PipelineResult<Value> {
    let body = body.replace("\r\n", "\n");
    let mut last_generated = None;

    for block in body.split("\n\n") {
        let mut event = None;
        let mut data = Vec::new();

        for line in block.lines() {
            if let Some(name) = line.strip_prefix("event:") {
                event = Some(name.trim());
            } else if let Some(payload) = line.strip_prefix("data:") {
                data.push(payload.trim());
            }
        }

        let data = data.join("\n");
        match event {
            Some("complete") => return first_output(&data),
            Some("error") => {
                let reason = if data.is_empty() || data == "null" {
                    "no details".to_string()
                } else {
                    data
                };
                return Err(PipelineError::Chat(reason));
            }
            Some("generating") if !data.is_empty() => last_generated = Some(data),
            _ => {}
        }
    }

    match last_generated {
        Some(data) => first_output(&data),
        None => Err(PipelineError::malformed(
            Stage::Chat,
            "event stream ended without a result",
        )),
    }
}

fn first_output(data: &str) -> PipelineResult<Value> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| PipelineError::malformed(Stage::Chat, e.to_string()))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::malformed(Stage::Chat, "empty data array")),
        other => Ok(other),
    }
}
