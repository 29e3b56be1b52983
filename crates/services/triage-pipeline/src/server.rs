//! HTTP surface of the triage demo.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::debug;

use common::{AppError, AppResult};
use domain::{InputMode, SpeechLanguage, ASSISTANT_LANGUAGES};

use crate::audio::AudioClip;
use crate::pipeline::{TriageOutcome, TriagePipeline, TriageRequest};

/// Largest accepted upload
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const TITLE: &str = "HealthAtlas AI";
const SUBTITLE: &str = "Multilingual AI Health Triage Assistant";

/// Shared demo state.
#[derive(Clone)]
pub struct DemoState {
    pub pipeline: Arc<TriagePipeline>,
}

impl DemoState {
    pub fn new(pipeline: TriagePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_router(state: DemoState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/options", get(options))
        .route("/api/triage", post(triage))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Json<Value> {
    Json(json!({
        "title": TITLE,
        "description": SUBTITLE,
        "languages": ASSISTANT_LANGUAGES,
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn options() -> Json<Value> {
    Json(json!({
        "modes": InputMode::ALL.iter().map(InputMode::as_str).collect::<Vec<_>>(),
        "default_mode": InputMode::default(),
        "languages": SpeechLanguage::ALL.iter().map(SpeechLanguage::as_str).collect::<Vec<_>>(),
        "default_language": SpeechLanguage::default(),
    }))
}

/// Run one query submitted as a multipart form.
async fn triage(
    State(state): State<DemoState>,
    multipart: Multipart,
) -> AppResult<Json<TriageOutcome>> {
    let request = read_form(multipart).await?;
    let outcome = state.pipeline.run(request).await?;
    Ok(Json(outcome))
}

async fn read_form(mut multipart: Multipart) -> AppResult<TriageRequest> {
    let mut request = TriageRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "mode" => {
                let value = field_text(field).await?;
                if !value.trim().is_empty() {
                    request.mode = InputMode::from_str(&value)?;
                }
            }
            "language" => {
                let value = field_text(field).await?;
                if !value.trim().is_empty() {
                    request.language = SpeechLanguage::from_str(&value)?;
                }
            }
            "text" => request.text = Some(field_text(field).await?),
            "audio" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(e.body_text()))?;
                request.audio = Some(AudioClip::new(bytes.to_vec()));
            }
            other => debug!("Ignoring form field {:?}", other),
        }
    }

    Ok(request)
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))
}
