//! Study Assistant - document summaries, quizzes and flashcards over HTTP

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_assistant::{
    api::{build_app, AppState},
    auth::{TokenInput, TokenVerifier},
    config::AppConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "study-assistant")]
#[command(version)]
#[command(about = "Study assistant API: summaries, quizzes and flashcards")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "STUDY_ASSISTANT_CONFIG")]
    config: Option<PathBuf>,

    /// HS256 secret for bearer tokens (overrides the config file)
    #[arg(long, env = "STUDY_ASSISTANT_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Mint a bearer token signed with the configured secret
    Token {
        /// Subject (identity-provider user ID)
        #[arg(short, long)]
        subject: String,

        /// Email claim
        #[arg(short, long)]
        email: Option<String>,

        /// Display name claim
        #[arg(short, long)]
        name: Option<String>,

        /// Lifetime in seconds
        #[arg(long, default_value = "3600")]
        expires_in: u64,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let mut config = if let Some(config_path) = &cli.config {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        AppConfig::from_toml(&content)?
    } else {
        AppConfig::default()
    };
    if let Some(secret) = cli.jwt_secret {
        config.auth.jwt_secret = Some(secret);
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await?;
        }
        Commands::Token {
            subject,
            email,
            name,
            expires_in,
        } => {
            let verifier = TokenVerifier::from_config(&config.auth)?.with_expiry(expires_in);
            let token = verifier.generate_token(TokenInput {
                subject,
                email,
                name,
            })?;
            println!("{}", token);
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("study_assistant={},tower_http={}", log_level, log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    tracing::info!("Starting Study Assistant");

    let state = AppState::from_config(&config)?;
    let app = build_app(state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        uploads_dir = %config.storage.uploads_dir.display(),
        "Study Assistant is listening. Press Ctrl+C to stop."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down...");
}

fn show_config(config: Option<&AppConfig>) -> Result<()> {
    let mut config = config.cloned().unwrap_or_default();
    if config.auth.jwt_secret.is_some() {
        config.auth.jwt_secret = Some("<redacted>".to_string());
    }
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
