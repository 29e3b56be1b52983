//! Triage Pipeline Library
//!
//! Chains the speech-to-text, language model and text-to-speech endpoints
//! behind a small HTTP demo, and wraps the hosted chat endpoint used by
//! the `chat` command.

pub mod audio;
pub mod chat;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::client::GradioInference;
use crate::config::DemoConfig;
use crate::pipeline::TriagePipeline;
use crate::server::{create_router, DemoState};

pub use error::{PipelineError, PipelineResult, Stage};

/// Run the demo server as an embedded component (for combined binary).
///
/// `host` and `port` override `DEMO_HOST` and `DEMO_PORT`.
pub async fn run_embedded(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = DemoConfig::from_env()?;
    config.server = config.server.with_overrides(host, port);
    run_server_with_config(config).await
}

/// Run the demo server with the given configuration.
pub async fn run_server_with_config(config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(GradioInference::new(&config.inference)?);
    let state = DemoState::new(TriagePipeline::new(backend));
    let app = create_router(state);

    let addr: SocketAddr = config.server.addr().parse()?;
    info!("Triage demo listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
