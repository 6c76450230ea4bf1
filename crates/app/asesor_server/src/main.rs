//! Asesor HTTP server binary.
//!
//! Serves the chat widget API. Provider, rate and profile settings come from
//! the environment (a `.env` file is honored); see `LlmConfig::from_env`,
//! `RateSettings::from_env` and `ProfileSource::from_env`.

use asesor_api::config::{ApiConfig, DEFAULT_HISTORY_LIMIT, parse_origins};
use asesor_api::services::chat::ChatService;
use asesor_core::llm::{CompletionClient, LlmConfig};
use asesor_core::profile::ProfileSource;
use asesor_core::rates::{RateService, RateSettings};
use clap::Parser;
use tracing::{info, warn};

/// CLI arguments for the server.
#[derive(Parser, Debug)]
#[command(name = "asesor_server", about = "Asesor sales chat server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 10000)]
    port: u16,

    /// Comma-separated CORS origins; `*` allows any.
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    allowed_origins: String,

    /// Prior turns forwarded to the model.
    #[arg(long, env = "HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,asesor_api=debug,asesor_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        allowed_origins: parse_origins(&args.allowed_origins),
        history_limit: args.history_limit,
    };

    let llm = CompletionClient::new(LlmConfig::from_env())?;
    let llm_config = llm.config();
    if llm_config.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; every chat message will get the apology reply");
    }
    info!(
        model = %llm_config.model,
        endpoint = %llm_config.endpoint(),
        timeout_secs = llm_config.timeout.as_secs(),
        "configuring completion provider"
    );

    let rates = RateService::new(RateSettings::from_env())?;
    let rate_settings = rates.settings();
    info!(
        sources = ?rate_settings.sources,
        ttl_secs = rate_settings.ttl.as_secs(),
        fallback = rate_settings.fallback,
        "configuring BCV rate cache"
    );

    let profiles = ProfileSource::from_env();
    // Fail early on a broken profile; requests would only apologize.
    let profile = profiles.load()?;
    info!(
        source = %profiles.describe(),
        store = %profile.store_name,
        products = profile.products.len(),
        "business profile loaded"
    );

    let chat = ChatService::new(rates, llm, profiles);
    let state = asesor_api::AppState::new(config.clone(), chat);
    let app = asesor_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, origins = ?config.allowed_origins, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
