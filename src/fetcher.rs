use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Config, FETCH_TIMEOUT_SECS, MARKET_FETCH_LIMIT};
use crate::error::{AppError, Result};
use crate::types::Market;

/// Fetch up to `MARKET_FETCH_LIMIT` open markets from the Gamma REST API.
///
/// Single attempt, no retry. On any failure (network, non-2xx, body parse)
/// the error is logged and an empty list is returned, which degrades the
/// refresh cycle to a no-op.
pub async fn fetch_markets(cfg: &Config) -> Vec<Market> {
    match try_fetch(cfg).await {
        Ok(markets) => {
            debug!("Gamma returned {} open markets", markets.len());
            markets
        }
        Err(e) => {
            warn!("Error fetching Polymarket data: {e}");
            Vec::new()
        }
    }
}

async fn try_fetch(cfg: &Config) -> Result<Vec<Market>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    let url = format!(
        "{}/markets?limit={}&closed=false",
        cfg.gamma_api_url, MARKET_FETCH_LIMIT
    );

    let resp: Value = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let items = resp
        .as_array()
        .ok_or_else(|| AppError::Fetch("Gamma /markets response was not an array".to_string()))?;

    Ok(items.iter().map(parse_gamma_market).collect())
}

/// Parse one Gamma market object. Lenient by design: whatever fields are
/// present are taken as-is, everything else stays None and is defaulted when
/// the article is built.
pub fn parse_gamma_market(v: &Value) -> Market {
    Market {
        id: v.get("id").and_then(value_to_id),
        question: v
            .get("question")
            .and_then(|q| q.as_str())
            .map(|s| s.to_string()),
        description: v
            .get("description")
            .and_then(|d| d.as_str())
            .map(|s| s.to_string()),
        category: v
            .get("category")
            .and_then(|c| c.as_str())
            .map(|s| s.to_string()),
        outcome_prices: v
            .get("outcomePrices")
            .map(parse_outcome_prices)
            .unwrap_or_default(),
        volume: v.get("volume").and_then(|x| {
            x.as_f64().or_else(|| x.as_str().and_then(|s| s.parse().ok()))
        }),
        image: v
            .get("image")
            .and_then(|i| i.as_str())
            .map(|s| s.to_string()),
        slug: v
            .get("slug")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
    }
}

/// Market ids arrive as either a JSON string or a bare number.
fn value_to_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `outcomePrices` is usually a JSON array of decimal strings embedded inside
/// a string (`"[\"0.73\", \"0.27\"]"`), but some payloads carry a real array
/// with string or numeric elements. Accept both shapes.
fn parse_outcome_prices(v: &Value) -> Vec<String> {
    match v {
        Value::String(s) => serde_json::from_str::<Vec<String>>(s).unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .filter_map(|p| match p {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
