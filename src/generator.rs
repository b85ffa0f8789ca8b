use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::warn;

use crate::config::{
    Config, ANTHROPIC_VERSION, DEFAULT_CATEGORY, GENERATION_MAX_TOKENS, GENERATION_MODEL,
    GENERATION_TIMEOUT_SECS, MARKET_URL_BASE, PLACEHOLDER_IMAGE, PROBABILITY_UNAVAILABLE,
};
use crate::error::{AppError, Result};
use crate::types::{Article, Market};

// ---------------------------------------------------------------------------
// ArticleGenerator
// ---------------------------------------------------------------------------

/// Generation strategy, chosen once at startup from the presence of
/// ANTHROPIC_API_KEY and never re-evaluated. `generate` is total: the AI
/// strategy absorbs every failure of its network call and falls back to the
/// plain derivation, so callers always receive a complete Article.
pub enum ArticleGenerator {
    Plain,
    Ai(AiGenerator),
}

impl ArticleGenerator {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(match &cfg.anthropic_api_key {
            Some(key) => {
                Self::Ai(AiGenerator::new(cfg.anthropic_api_url.clone(), key.clone())?)
            }
            None => Self::Plain,
        })
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Self::Ai(_))
    }

    pub async fn generate(&self, market: &Market) -> Article {
        match self {
            Self::Plain => plain_article(market),
            Self::Ai(ai) => match ai.try_generate(market).await {
                Ok(article) => article,
                Err(e) => {
                    warn!("Error generating AI article: {e}");
                    plain_article(market)
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Plain strategy
// ---------------------------------------------------------------------------

/// Derive an article purely from the market's own fields. No I/O, never fails.
pub fn plain_article(market: &Market) -> Article {
    let question = market.question.clone().unwrap_or_default();
    let summary = market
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("Analysis of the prediction market: {question}"));
    article_from_parts(market, summary)
}

/// Shared field-defaulting for both strategies. Only the summary differs
/// between them.
fn article_from_parts(market: &Market, summary: String) -> Article {
    Article {
        id: market.id.clone().unwrap_or_else(timestamp_id),
        title: market.question.clone().unwrap_or_default(),
        summary,
        category: market
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        probability: probability_string(market),
        volume: market.volume.unwrap_or(0.0),
        image: market
            .image
            .clone()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        created_at: now_secs(),
        market_url: market_url(market),
    }
}

/// Primary outcome price as a one-decimal percentage string. "N/A" when the
/// price is missing, unparsable, or outside [0, 1].
pub fn probability_string(market: &Market) -> String {
    market
        .outcome_prices
        .first()
        .and_then(|p| p.trim().parse::<f64>().ok())
        .filter(|p| (0.0..=1.0).contains(p))
        .map(|p| format!("{:.1}", p * 100.0))
        .unwrap_or_else(|| PROBABILITY_UNAVAILABLE.to_string())
}

/// Canonical Polymarket event URL, built from the slug when present.
fn market_url(market: &Market) -> String {
    let segment = market
        .slug
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| market.id.clone())
        .unwrap_or_default();
    format!("{MARKET_URL_BASE}/{segment}")
}

/// Best-effort unique id for markets that arrive without one.
fn timestamp_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .to_string()
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ---------------------------------------------------------------------------
// AI strategy
// ---------------------------------------------------------------------------

/// Summarizes markets via the Anthropic messages endpoint. Everything except
/// the summary text follows the same defaulting as the plain strategy.
pub struct AiGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl AiGenerator {
    pub fn new(api_url: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(GENERATION_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_url, api_key })
    }

    async fn try_generate(&self, market: &Market) -> Result<Article> {
        let prompt = build_prompt(market);
        let body = serde_json::json!({
            "model": GENERATION_MODEL,
            "max_tokens": GENERATION_MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let resp: Value = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let summary = resp
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|a| a.first())
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                AppError::Generation("messages response had no content[0].text".to_string())
            })?
            .to_string();

        Ok(article_from_parts(market, summary))
    }
}

fn build_prompt(market: &Market) -> String {
    let question = market.question.clone().unwrap_or_default();
    let probability = probability_string(market);
    let category = market
        .category
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "General".to_string());

    format!(
        "Write a concise news article (150-200 words) about this prediction market:\n\n\
         Question: \"{question}\"\n\
         Current Probability: {probability}%\n\
         Category: {category}\n\n\
         Write it as a news article analyzing what this prediction market tells us about \
         future events. Keep it objective and informative. Don't use phrases like \
         \"prediction market shows\" - just report on the event itself."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_market() -> Market {
        Market {
            question: Some("Will X happen?".to_string()),
            ..Market::default()
        }
    }

    #[test]
    fn plain_article_fills_every_default() {
        let a = plain_article(&bare_market());
        assert!(!a.id.is_empty(), "id should fall back to a timestamp");
        assert_eq!(a.title, "Will X happen?");
        assert_eq!(a.summary, "Analysis of the prediction market: Will X happen?");
        assert_eq!(a.category, DEFAULT_CATEGORY);
        assert_eq!(a.probability, PROBABILITY_UNAVAILABLE);
        assert_eq!(a.volume, 0.0);
        assert_eq!(a.image, PLACEHOLDER_IMAGE);
        assert!(a.created_at > 0);
        assert_eq!(a.market_url, format!("{MARKET_URL_BASE}/"));
    }

    #[test]
    fn plain_article_prefers_description() {
        let mut m = bare_market();
        m.description = Some("Background on X.".to_string());
        let a = plain_article(&m);
        assert_eq!(a.summary, "Background on X.");
    }

    #[test]
    fn empty_description_falls_back_to_generated_sentence() {
        let mut m = bare_market();
        m.description = Some(String::new());
        let a = plain_article(&m);
        assert_eq!(a.summary, "Analysis of the prediction market: Will X happen?");
    }

    #[test]
    fn probability_formats_one_decimal() {
        let mut m = bare_market();
        m.outcome_prices = vec!["0.73".to_string(), "0.27".to_string()];
        assert_eq!(probability_string(&m), "73.0");

        m.outcome_prices = vec!["0.005".to_string()];
        assert_eq!(probability_string(&m), "0.5");

        m.outcome_prices = vec!["1".to_string()];
        assert_eq!(probability_string(&m), "100.0");
    }

    #[test]
    fn probability_sentinel_for_bad_prices() {
        let mut m = bare_market();
        assert_eq!(probability_string(&m), "N/A");

        m.outcome_prices = vec!["abc".to_string()];
        assert_eq!(probability_string(&m), "N/A");

        m.outcome_prices = vec!["1.5".to_string()];
        assert_eq!(probability_string(&m), "N/A");

        m.outcome_prices = vec!["-0.1".to_string()];
        assert_eq!(probability_string(&m), "N/A");
    }

    #[test]
    fn market_url_prefers_slug_over_id() {
        let mut m = bare_market();
        m.id = Some("99".to_string());
        m.slug = Some("will-x-happen".to_string());
        let a = plain_article(&m);
        assert_eq!(a.market_url, format!("{MARKET_URL_BASE}/will-x-happen"));

        m.slug = None;
        let a = plain_article(&m);
        assert_eq!(a.market_url, format!("{MARKET_URL_BASE}/99"));
    }

    #[test]
    fn market_id_carries_through() {
        let mut m = bare_market();
        m.id = Some("517310".to_string());
        let a = plain_article(&m);
        assert_eq!(a.id, "517310");
    }

    #[test]
    fn prompt_embeds_question_probability_and_category() {
        let mut m = bare_market();
        m.outcome_prices = vec!["0.73".to_string()];
        m.category = Some("Politics".to_string());
        let prompt = build_prompt(&m);
        assert!(prompt.contains("\"Will X happen?\""));
        assert!(prompt.contains("Current Probability: 73.0%"));
        assert!(prompt.contains("Category: Politics"));
    }

    #[tokio::test]
    async fn ai_failure_falls_back_to_plain_article() {
        // Unroutable endpoint forces the network call to fail.
        let ai = AiGenerator::new("http://127.0.0.1:9".to_string(), "test-key".to_string())
            .expect("client should build");
        let generator = ArticleGenerator::Ai(ai);
        let mut m = bare_market();
        m.id = Some("7".to_string());
        m.outcome_prices = vec!["0.4".to_string()];

        let from_ai_path = generator.generate(&m).await;
        let from_plain = plain_article(&m);

        assert_eq!(from_ai_path.id, from_plain.id);
        assert_eq!(from_ai_path.title, from_plain.title);
        assert_eq!(from_ai_path.summary, from_plain.summary);
        assert_eq!(from_ai_path.probability, from_plain.probability);
        assert_eq!(from_ai_path.category, from_plain.category);
        assert_eq!(from_ai_path.market_url, from_plain.market_url);
    }
}
