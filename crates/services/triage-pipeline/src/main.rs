//! Triage demo - chains ASR, LLM and TTS endpoints, plus a one-off chat call.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain::{
    InputMode, SpeechLanguage, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_P,
};
use triage_pipeline_lib::chat::ChatRequest;
use triage_pipeline_lib::commands;
use triage_pipeline_lib::config::DEFAULT_CHAT_API_NAME;

#[derive(Parser)]
#[command(name = "triage-demo")]
#[command(about = "HealthAtlas multilingual triage demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the demo HTTP server
    Serve {
        /// Overrides DEMO_HOST (default 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
        /// Overrides DEMO_PORT (default 7860)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one query through the pipeline
    Ask {
        /// Text or Audio
        #[arg(long, default_value = "text")]
        mode: String,
        #[arg(long)]
        text: Option<String>,
        /// Recording to transcribe in audio mode
        #[arg(long)]
        audio: Option<PathBuf>,
        /// yoruba or hausa
        #[arg(long, default_value = "yoruba")]
        language: String,
    },
    /// Send one message to the hosted chat endpoint
    Chat {
        #[arg(long, default_value = "Do you understand yoruba?")]
        message: String,
        #[arg(long, default_value = DEFAULT_SYSTEM_MESSAGE)]
        system_message: String,
        #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: u32,
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
        temperature: f64,
        #[arg(long, default_value_t = DEFAULT_TOP_P)]
        top_p: f64,
        #[arg(long, default_value = DEFAULT_CHAT_API_NAME)]
        api_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            triage_pipeline_lib::run_embedded(host, port).await?;
        }
        Commands::Ask {
            mode,
            text,
            audio,
            language,
        } => {
            let mode = InputMode::from_str(&mode)?;
            let language = SpeechLanguage::from_str(&language)?;
            let outcome = commands::ask(mode, text, audio.as_deref(), language).await?;

            println!("{}", outcome.response);
            if let Some(audio) = outcome.audio {
                println!("audio: {}", audio);
            }
        }
        Commands::Chat {
            message,
            system_message,
            max_tokens,
            temperature,
            top_p,
            api_name,
        } => {
            let request = ChatRequest {
                message,
                system_message,
                max_tokens,
                temperature,
                top_p,
            };
            let result = commands::chat(&api_name, &request).await?;

            println!("generating.....\n");
            println!("{}", commands::display_result(&result));
        }
    }

    Ok(())
}
