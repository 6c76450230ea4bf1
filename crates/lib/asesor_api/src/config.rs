//! API server configuration.

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:10000").
    pub bind_addr: String,
    /// Origins allowed by CORS. Empty or `["*"]` allows any origin.
    pub allowed_origins: Vec<String>,
    /// Maximum number of prior turns forwarded to the model.
    pub history_limit: usize,
}

/// Prior turns kept for context.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:10000".into(),
            allowed_origins: vec!["*".into()],
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ApiConfig {
    /// True when CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Split a comma-separated origin list.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
