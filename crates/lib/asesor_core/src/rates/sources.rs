//! Rate sources — one GET per URL, three accepted response shapes.

use std::collections::HashMap;

use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;

use super::RateError;

/// Sources tried in order when no environment override is given.
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://ve.dolarapi.com/v1/dolares/oficial",
    "https://pydolarve.org/api/v2/dollar?page=bcv",
    "https://open.er-api.com/v6/latest/USD",
];

/// Monitor keys checked, in order, in the `monitors` shape.
const MONITOR_KEYS: &[&str] = &["usd", "bcv"];

/// Currency codes checked, in order, in the `rates` shape.
const RATE_CODES: &[&str] = &["VES", "VEF"];

/// A number that some APIs send as a string, possibly with a decimal comma.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RateNumber {
    Number(f64),
    Text(String),
}

impl RateNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => {
                let s = s.trim();
                let normalized = if s.contains(',') {
                    s.replace('.', "").replace(',', ".")
                } else {
                    s.to_string()
                };
                normalized.parse().ok()
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Monitor {
    #[serde(default)]
    pub price: Option<RateNumber>,
}

/// Body of a rate source response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatePayload {
    /// `{"promedio": 36.5, ...}`
    Average { promedio: RateNumber },
    /// `{"monitors": {"usd": {"price": 36.5}}}`
    Monitors { monitors: HashMap<String, Monitor> },
    /// `{"rates": {"VES": 36.5, ...}}`
    Rates { rates: HashMap<String, RateNumber> },
}

impl RatePayload {
    /// The bolívars-per-dollar rate, if the payload carries a usable one.
    pub fn value(&self) -> Option<f64> {
        let raw = match self {
            Self::Average { promedio } => promedio.as_f64(),
            Self::Monitors { monitors } => MONITOR_KEYS
                .iter()
                .filter_map(|key| monitors.get(*key))
                .find_map(|m| m.price.as_ref().and_then(RateNumber::as_f64)),
            Self::Rates { rates } => RATE_CODES
                .iter()
                .filter_map(|code| rates.get(*code))
                .find_map(RateNumber::as_f64),
        };
        raw.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Parse a response body into a rate.
pub fn parse_rate(body: &str) -> Result<f64, RateError> {
    let payload: RatePayload = serde_json::from_str(body)?;
    payload.value().ok_or(RateError::NoValue)
}

/// Fetch and parse one source.
pub async fn fetch_from(client: &Client, url: &str) -> Result<f64, RateError> {
    let resp = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(RateError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await?;
    parse_rate(&body)
}
