//! API Gateway Library
//!
//! This crate provides the HTTP REST API that forwards signup, login,
//! password reset and profile requests to the identity provider.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::clients::SupabaseAuthClient;
use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway as an embedded component (for combined binary).
///
/// `host` and `port` override `GATEWAY_HOST` and `GATEWAY_PORT`.
pub async fn run_embedded(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env()?;
    config.server = config.server.with_overrides(host, port);
    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Create identity provider client
    let identity = Arc::new(SupabaseAuthClient::new(
        &config.supabase_url,
        config.supabase_anon_key(),
        config.identity_timeout,
    )?);

    // Build address
    let addr: SocketAddr = config.server.addr().parse()?;

    // Create app state and router
    let state = AppState::new(identity, config);
    let app = create_router(state);

    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
