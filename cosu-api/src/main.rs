//! cosu-api - Speaking-exam coaching service
//!
//! **Module Identity:**
//! - Name: cosu-api
//! - Port: 4000 (default)
//!
//! Scores spoken answers by fusing an acoustic model with a generative text
//! assessment, and produces improvement tips and target-level sample answers.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use cosu_api::config::{CliOverrides, ServiceConfig};
use cosu_api::services::{AcousticScoringClient, OpenAiChatEngine, WhisperTranscriber};
use cosu_api::{build_router, AppState, Collaborators};
use cosu_common::config::{default_config_path, load_toml_config};

/// Command-line arguments for cosu-api
#[derive(Parser, Debug)]
#[command(name = "cosu-api")]
#[command(about = "Speaking-exam coaching service")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "COSU_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(short, long, env = "COSU_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "COSU_PORT")]
    port: Option<u16>,
}

/// Filter for the configured level, applied to the workspace crates
fn level_filter(level: &str) -> Option<EnvFilter> {
    let level = level.trim().to_lowercase();
    EnvFilter::try_new(format!(
        "warn,cosu_api={level},cosu_common={level},tower_http={level}"
    ))
    .ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG wins; otherwise start at info and apply the configured level once loaded
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    let initial_filter = if rust_log_set {
        EnvFilter::from_default_env()
    } else {
        level_filter("info").unwrap_or_else(|| EnvFilter::new("info"))
    };
    let (filter, filter_handle) = reload::Layer::new(initial_filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting cosu-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(default_config_path)
        .context("No config directory available; pass --config")?;
    let toml_config = load_toml_config(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    if !rust_log_set {
        match level_filter(&toml_config.logging.level) {
            Some(filter) => {
                if let Err(e) = filter_handle.reload(filter) {
                    warn!("Failed to apply configured log level: {}", e);
                }
            }
            None => warn!(
                level = %toml_config.logging.level,
                "Invalid logging.level in config, keeping info"
            ),
        }
    }

    let cli = CliOverrides {
        bind: args.bind.clone(),
        port: args.port,
    };
    let config = ServiceConfig::resolve(&cli, &toml_config).context("Invalid configuration")?;

    // Collaborator clients, built once and shared
    let timeout = config.request_timeout_secs;
    let collaborators = Collaborators {
        transcriber: Arc::new(
            WhisperTranscriber::new(
                &config.openai.base_url,
                config.openai.api_key.clone(),
                config.openai.transcription_model.clone(),
                timeout,
            )
            .context("Failed to create transcription client")?,
        ),
        acoustic: Arc::new(
            AcousticScoringClient::new(&config.scoring_url, timeout)
                .context("Failed to create acoustic scoring client")?,
        ),
        engine: Arc::new(
            OpenAiChatEngine::new(
                &config.openai.base_url,
                config.openai.api_key.clone(),
                config.openai.model.clone(),
                config.openai.temperature,
                timeout,
            )
            .context("Failed to create generative engine client")?,
        ),
    };
    info!("Collaborator clients initialized");

    let shutdown = CancellationToken::new();
    let state = AppState::new(collaborators, config.assessment.clone(), shutdown.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen_addr))?;
    info!("Listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight pipelines
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }

    shutdown.cancel();
}
