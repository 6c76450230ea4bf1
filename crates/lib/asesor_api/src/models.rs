//! Request and response bodies.
//!
//! Field names follow the web widget this service was built for
//! (`mensaje`, `historial`, `respuesta`); English aliases are accepted on
//! input.

use asesor_core::profile::ProfileSummary;
use asesor_core::rates::RateQuote;
use serde::{Deserialize, Serialize};

/// A prior turn as sent by the widget.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// `POST /chat` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "message", default)]
    pub mensaje: String,
    #[serde(alias = "history", default)]
    pub historial: Option<Vec<HistoryTurn>>,
}

/// `POST /chat` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text to show the customer.
    pub respuesta: String,
    /// Whether the widget should surface the WhatsApp button.
    pub mostrar_whatsapp: bool,
    /// `wa.me` link for the button, when a number is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
}

/// `GET /` reply.
#[derive(Debug, Clone, Serialize)]
pub struct HomeResponse {
    pub status: String,
    pub tasa_actual: f64,
}

/// `GET /health` reply.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /config` reply.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfigResponse {
    #[serde(flatten)]
    pub store: ProfileSummary,
    pub rate: RateQuote,
}

/// JSON body for error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
