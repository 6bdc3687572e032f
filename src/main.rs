#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use civicbot::config::Config;
use civicbot::conversation::{ConversationManager, DEFAULT_USER_ID};
use civicbot::{gateway, providers};

/// CivicBot - civic-issue reporting chatbot backed by Gemini.
#[derive(Parser, Debug)]
#[command(name = "civicbot")]
#[command(version = "0.1.0")]
#[command(about = "Civic-issue reporting chatbot gateway.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway (chat API + health check + test page)
    Serve {
        /// Port to listen on (use 0 for a random free port); defaults to config gateway.port
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to; defaults to config gateway.host
        #[arg(long)]
        host: Option<String>,
    },

    /// Send a single message from the terminal (no server)
    Chat {
        /// The message to send
        message: String,

        /// User id for the session
        #[arg(short, long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real env vars win either way
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging - respects RUST_LOG env var, defaults to INFO
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load_or_init()?;
    if !config.gemini_configured() {
        tracing::warn!(
            "no Gemini API key configured; replies will come from the scripted fallback"
        );
    }

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            gateway::run_gateway(&host, port, config).await
        }

        Commands::Chat { message, user } => {
            let provider: Arc<dyn providers::Provider> = Arc::from(providers::create_provider(
                "gemini",
                config.api_key.as_deref(),
                &config.generation,
            )?);
            let manager = ConversationManager::new(
                provider,
                config.default_model.clone(),
                config.default_temperature,
            );

            let user_id = user.as_deref().unwrap_or(DEFAULT_USER_ID);
            let outcome = manager.handle_message(user_id, &message).await;
            if outcome.used_fallback {
                tracing::warn!("remote model unavailable, scripted reply follows");
            }
            println!("{}", outcome.response);
            Ok(())
        }
    }
}
