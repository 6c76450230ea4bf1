//! # asesor_api
//!
//! HTTP API library for Asesor.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ApiConfig;
use crate::handlers::{chat, config as store_config, health, home};
use crate::services::chat::ChatService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Chat pipeline: profile, rates and completion client.
    pub chat: Arc<ChatService>,
}

impl AppState {
    pub fn new(config: ApiConfig, chat: ChatService) -> Self {
        let chat = chat.with_history_limit(config.history_limit);
        Self {
            config,
            chat: Arc::new(chat),
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        .route("/config", get(store_config::store_config_handler))
        .route("/chat", post(chat::chat_handler))
        .fallback(health::not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
