//! Combined binary for development - runs the gateway and the triage demo in one process.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "healthatlas")]
#[command(about = "HealthAtlas API and triage demo in a single process")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway and the demo server together (development mode)
    Serve {
        /// Bind host for both servers; overrides GATEWAY_HOST and DEMO_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides GATEWAY_PORT (default 8000)
        #[arg(long)]
        gateway_port: Option<u16>,
        /// Overrides DEMO_PORT (default 7860)
        #[arg(long)]
        demo_port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            gateway_port,
            demo_port,
        } => {
            info!("Starting combined services in development mode");

            let gateway_host = host.clone();
            let gateway_handle = tokio::spawn(async move {
                if let Err(e) = gateway_lib::run_embedded(gateway_host, gateway_port).await {
                    error!("Gateway failed: {}", e);
                }
            });

            let demo_handle = tokio::spawn(async move {
                if let Err(e) = triage_pipeline_lib::run_embedded(host, demo_port).await {
                    error!("Triage demo failed: {}", e);
                }
            });

            // Either task returning means a server stopped
            tokio::select! {
                _ = gateway_handle => {
                    error!("Gateway exited unexpectedly");
                }
                _ = demo_handle => {
                    error!("Triage demo exited unexpectedly");
                }
            }
        }
    }

    Ok(())
}
