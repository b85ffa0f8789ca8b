use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::future::join_all;
use tracing::info;

use crate::config::{Config, ARTICLES_PER_CYCLE};
use crate::fetcher::fetch_markets;
use crate::generator::ArticleGenerator;
use crate::state::ArticleStore;
use crate::types::{Article, Market};

/// Runs the fetch-generate-replace cycle: once at startup, then at minute 0
/// of every hour.
///
/// Cycles execute inline in this task, so they are serialized by
/// construction: a cycle that overruns the top of the hour delays the next
/// one instead of overlapping it.
pub struct ArticleRefresher {
    cfg: Config,
    store: Arc<ArticleStore>,
    generator: ArticleGenerator,
}

impl ArticleRefresher {
    pub fn new(cfg: Config, store: Arc<ArticleStore>, generator: ArticleGenerator) -> Self {
        Self { cfg, store, generator }
    }

    pub async fn run(self) {
        self.refresh().await;

        loop {
            let wait = secs_until_next_hour(now_secs());
            tokio::time::sleep(Duration::from_secs(wait)).await;
            self.refresh().await;
        }
    }

    async fn refresh(&self) {
        info!("Fetching latest Polymarket data...");
        let markets = fetch_markets(&self.cfg).await;
        self.apply(markets).await;
    }

    /// Turn a fetched market batch into articles and publish them. An empty
    /// batch (including a failed fetch) leaves the current articles in place
    /// rather than clearing them.
    async fn apply(&self, markets: Vec<Market>) {
        if markets.is_empty() {
            info!("No markets returned; keeping current articles");
            return;
        }

        let articles = self.build_articles(&markets).await;
        info!("Updated {} articles", articles.len());
        self.store.replace(articles);
    }

    /// Generate one article per market, concurrently. `join_all` collects
    /// results positionally, so the output order is the input market order
    /// regardless of which generation calls finish first.
    async fn build_articles(&self, markets: &[Market]) -> Vec<Article> {
        let futures = markets
            .iter()
            .take(ARTICLES_PER_CYCLE)
            .map(|m| self.generator.generate(m));
        join_all(futures).await
    }
}

/// Seconds until the next wall-clock top of the hour. Never zero: exactly on
/// the hour the wait is a full hour.
pub fn secs_until_next_hour(now_secs: u64) -> u64 {
    3600 - now_secs % 3600
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_refresher(store: Arc<ArticleStore>) -> ArticleRefresher {
        let cfg = Config {
            port: 3000,
            log_level: "info".to_string(),
            gamma_api_url: "http://127.0.0.1:9".to_string(),
            anthropic_api_url: "http://127.0.0.1:9".to_string(),
            anthropic_api_key: None,
        };
        ArticleRefresher::new(cfg, store, ArticleGenerator::Plain)
    }

    fn market(id: &str, question: &str) -> Market {
        Market {
            id: Some(id.to_string()),
            question: Some(question.to_string()),
            ..Market::default()
        }
    }

    #[tokio::test]
    async fn empty_batch_leaves_store_unchanged() {
        let store = ArticleStore::new();
        let refresher = plain_refresher(Arc::clone(&store));

        refresher.apply(vec![market("1", "Will X happen?")]).await;
        assert_eq!(store.len(), 1);

        refresher.apply(Vec::new()).await;
        assert_eq!(store.len(), 1, "empty fetch must not clear the store");
        assert_eq!(store.all()[0].id, "1");
    }

    #[tokio::test]
    async fn batch_replaces_store_in_input_order() {
        let store = ArticleStore::new();
        let refresher = plain_refresher(Arc::clone(&store));

        let markets: Vec<Market> = (1..=4)
            .map(|i| market(&i.to_string(), &format!("Q{i}")))
            .collect();
        refresher.apply(markets).await;

        let all = store.all();
        assert_eq!(all.len(), 4);
        let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn batch_is_capped_at_articles_per_cycle() {
        let store = ArticleStore::new();
        let refresher = plain_refresher(Arc::clone(&store));

        let markets: Vec<Market> = (0..ARTICLES_PER_CYCLE + 5)
            .map(|i| market(&i.to_string(), &format!("Q{i}")))
            .collect();
        refresher.apply(markets).await;

        assert_eq!(store.len(), ARTICLES_PER_CYCLE);
    }

    #[tokio::test]
    async fn end_to_end_plain_cycle_matches_expected_articles() {
        let store = ArticleStore::new();
        let refresher = plain_refresher(Arc::clone(&store));

        let mut m1 = market("1", "Will X happen?");
        m1.outcome_prices = vec!["0.73".to_string(), "0.27".to_string()];
        m1.category = Some("Politics".to_string());
        let m2 = market("2", "Will Y happen?");

        refresher.apply(vec![m1, m2]).await;

        let all = store.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "1");
        assert_eq!(all[0].title, "Will X happen?");
        assert_eq!(all[0].probability, "73.0");
        assert_eq!(all[0].category, "Politics");
        assert_eq!(all[1].id, "2");
        assert_eq!(all[1].title, "Will Y happen?");
        assert_eq!(all[1].probability, "N/A");
        assert_eq!(all[1].category, "Politics");
    }

    #[test]
    fn next_hour_wait_is_remainder_of_current_hour() {
        assert_eq!(secs_until_next_hour(0), 3600);
        assert_eq!(secs_until_next_hour(3599), 1);
        assert_eq!(secs_until_next_hour(3600), 3600);
        assert_eq!(secs_until_next_hour(7215), 3585);
    }
}
