//! One-shot command line actions.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use domain::{InputMode, SpeechLanguage};

use crate::audio::AudioClip;
use crate::chat::{ChatClient, ChatRequest};
use crate::client::GradioInference;
use crate::config::{ChatConfig, InferenceConfig};
use crate::pipeline::{TriageOutcome, TriagePipeline, TriageRequest};

/// Run a single query through the pipeline.
pub async fn ask(
    mode: InputMode,
    text: Option<String>,
    audio: Option<&Path>,
    language: SpeechLanguage,
) -> Result<TriageOutcome, Box<dyn std::error::Error>> {
    let config = InferenceConfig::from_env()?;
    let pipeline = TriagePipeline::new(Arc::new(GradioInference::new(&config)?));

    let audio = match audio {
        Some(path) => Some(AudioClip::from_file(path).await?),
        None => None,
    };

    let outcome = pipeline
        .run(TriageRequest {
            mode,
            text,
            audio,
            language,
        })
        .await?;

    Ok(outcome)
}

/// Call the chat endpoint once.
pub async fn chat(
    api_name: &str,
    request: &ChatRequest,
) -> Result<Value, Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env()?;
    let client = ChatClient::new(&config)?;
    Ok(client.predict(api_name, request).await?)
}

/// Render a chat result the way it is printed.
pub fn display_result(result: &Value) -> String {
    match result {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_display_result_unquotes_text() {
        assert_eq!(display_result(&json!("Bẹẹni")), "Bẹẹni");
        assert_eq!(display_result(&json!(["a", 1])), r#"["a",1]"#);
    }
}
