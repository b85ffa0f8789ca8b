use crate::error::{AppError, Result};

pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
pub const MARKET_URL_BASE: &str = "https://polymarket.com/event";

/// How many open markets to request from Gamma per refresh.
pub const MARKET_FETCH_LIMIT: usize = 20;

/// How many of the fetched markets become articles each cycle.
pub const ARTICLES_PER_CYCLE: usize = 15;

/// Model used for AI summaries.
pub const GENERATION_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Max output tokens per summary request.
pub const GENERATION_MAX_TOKENS: u32 = 1024;

/// Version header required by the Anthropic messages endpoint.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Shown when a market carries no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x400";

/// Category assigned when the market has none.
pub const DEFAULT_CATEGORY: &str = "Politics";

/// Probability string when outcome prices are missing or unparsable.
pub const PROBABILITY_UNAVAILABLE: &str = "N/A";

/// Outbound HTTP timeout (seconds) for market fetches.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Outbound HTTP timeout (seconds) for generation calls.
pub const GENERATION_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub gamma_api_url: String,
    pub anthropic_api_url: String,
    /// Presence selects the AI strategy for the lifetime of the process.
    pub anthropic_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            gamma_api_url: std::env::var("GAMMA_API_URL")
                .unwrap_or_else(|_| GAMMA_API_URL.to_string()),
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| ANTHROPIC_API_URL.to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }
}
