//! BCV rate lookup — read-through cache over a prioritized list of sources.
//!
//! [`RateService::current`] never fails. It answers from the cache while the
//! value is fresh, otherwise tries each source in order and keeps the first
//! usable answer. When every source fails it falls back to the last good
//! value, then to the configured constant. Refresh attempts are throttled to
//! one per TTL so a dead upstream is not hit on every chat message.

pub mod cache;
pub mod sources;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use cache::RateCache;

/// Rate used when nothing has ever been fetched.
pub const DEFAULT_FALLBACK_RATE: f64 = 54.50;

/// Longest accepted cache lifetime; larger settings are clamped.
pub const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Per-source request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Errors from a single rate source.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Unrecognized rate payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Payload carries no usable rate")]
    NoValue,
}

/// Where a quoted rate came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "url")]
pub enum RateOrigin {
    /// Fetched just now from the given source.
    Live(String),
    /// Served from a fresh cache entry.
    Cached,
    /// Last good value, older than the TTL.
    Stale,
    /// Configured constant; no source has ever answered.
    Fallback,
}

/// A rate together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    pub value: f64,
    pub origin: RateOrigin,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Settings for [`RateService`].
#[derive(Debug, Clone)]
pub struct RateSettings {
    /// Source URLs in priority order.
    pub sources: Vec<String>,
    /// Freshness window and minimum gap between refresh attempts.
    pub ttl: Duration,
    /// Rate returned when no value has ever been fetched.
    pub fallback: f64,
    /// Timeout for each source request.
    pub request_timeout: Duration,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            sources: sources::DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            ttl: Duration::from_secs(cache::DEFAULT_TTL_SECS as u64),
            fallback: DEFAULT_FALLBACK_RATE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl RateSettings {
    /// Reads settings from environment variables with sensible defaults.
    ///
    /// | Variable            | Default                      |
    /// |---------------------|------------------------------|
    /// | `RATE_SOURCES`      | built-in list, comma-separated |
    /// | `RATE_TTL_SECS`     | `300`                        |
    /// | `TASA_BCV`          | `54.50`                      |
    /// | `RATE_TIMEOUT_SECS` | `5`                          |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RateSettings::from_env`], reading values through `lookup`.
    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        let sources = lookup("RATE_SOURCES")
            .map(|raw| parse_sources(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.sources);

        let ttl = secs("RATE_TTL_SECS").unwrap_or(defaults.ttl);

        let fallback = lookup("TASA_BCV")
            .and_then(|v| sources::RateNumber::Text(v).as_f64())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(defaults.fallback);

        let request_timeout = secs("RATE_TIMEOUT_SECS").unwrap_or(defaults.request_timeout);

        Self {
            sources,
            ttl,
            fallback,
            request_timeout,
        }
    }
}

/// Split a comma-separated list, dropping entries that are not http(s) URLs.
pub fn parse_sources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| match url::Url::parse(s) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => true,
            _ => {
                warn!(source = %s, "ignoring invalid rate source URL");
                false
            }
        })
        .map(str::to_string)
        .collect()
}

/// Read-through cache over the configured rate sources.
#[derive(Debug, Clone)]
pub struct RateService {
    client: Client,
    settings: Arc<RateSettings>,
    cache: Arc<RwLock<RateCache>>,
    refresh: Arc<Mutex<()>>,
}

impl RateService {
    pub fn new(settings: RateSettings) -> Result<Self, RateError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        let ttl = cache_ttl(settings.ttl);
        Ok(Self {
            client,
            settings: Arc::new(settings),
            cache: Arc::new(RwLock::new(RateCache::with_ttl(ttl))),
            refresh: Arc::new(Mutex::new(())),
        })
    }

    pub fn settings(&self) -> &RateSettings {
        &self.settings
    }

    /// Current rate. Never fails; see the module docs for the fallback chain.
    pub async fn current(&self) -> RateQuote {
        if let Some(quote) = self.without_refresh().await {
            return quote;
        }

        // One refresh at a time. Callers that find one in flight answer with
        // the last good value; without one they wait for its result.
        let _guard = match self.refresh.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                {
                    let cache = self.cache.read().await;
                    if cache.last_known().is_some() {
                        debug!("rate refresh in flight, serving last known value");
                        return self.degraded(&cache);
                    }
                }
                self.refresh.lock().await
            }
        };
        if let Some(quote) = self.without_refresh().await {
            return quote;
        }

        for url in &self.settings.sources {
            match sources::fetch_from(&self.client, url).await {
                Ok(value) => {
                    let entry = self.cache.write().await.record_success(value);
                    info!(source = %url, rate = value, "BCV rate refreshed");
                    return RateQuote {
                        value,
                        origin: RateOrigin::Live(url.clone()),
                        fetched_at: Some(entry.fetched_at),
                    };
                }
                Err(e) => warn!(source = %url, error = %e, "rate source failed"),
            }
        }

        let mut cache = self.cache.write().await;
        cache.record_failure();
        let quote = self.degraded(&cache);
        warn!(rate = quote.value, origin = ?quote.origin, "all rate sources failed");
        quote
    }

    /// Last known rate without touching the network.
    pub async fn peek(&self) -> RateQuote {
        let cache = self.cache.read().await;
        match cache.fresh() {
            Some(entry) => RateQuote {
                value: entry.value,
                origin: RateOrigin::Cached,
                fetched_at: Some(entry.fetched_at),
            },
            None => self.degraded(&cache),
        }
    }

    /// Drop the cached value.
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }

    /// Answer from the cache when it is fresh or when a refresh is throttled.
    async fn without_refresh(&self) -> Option<RateQuote> {
        let cache = self.cache.read().await;
        if let Some(entry) = cache.fresh() {
            return Some(RateQuote {
                value: entry.value,
                origin: RateOrigin::Cached,
                fetched_at: Some(entry.fetched_at),
            });
        }
        if cache.recently_attempted() {
            debug!("rate refresh throttled");
            return Some(self.degraded(&cache));
        }
        None
    }

    fn degraded(&self, cache: &RateCache) -> RateQuote {
        match cache.last_known() {
            Some(entry) => RateQuote {
                value: entry.value,
                origin: RateOrigin::Stale,
                fetched_at: Some(entry.fetched_at),
            },
            None => RateQuote {
                value: self.settings.fallback,
                origin: RateOrigin::Fallback,
                fetched_at: None,
            },
        }
    }
}

/// Cache lifetime as a `chrono` duration, clamped to [`MAX_TTL_SECS`].
fn cache_ttl(ttl: Duration) -> chrono::Duration {
    let max = Duration::from_secs(MAX_TTL_SECS);
    let ttl = if ttl > max {
        warn!(
            requested_secs = ttl.as_secs(),
            max_secs = MAX_TTL_SECS,
            "rate TTL too large, clamping"
        );
        max
    } else {
        ttl
    };
    chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::seconds(MAX_TTL_SECS as i64))
}
