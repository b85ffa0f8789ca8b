// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

/// A prediction market as returned by the Gamma REST API. Every field except
/// the identifier can be missing upstream, so everything is optional here and
/// defaulting happens at article-construction time.
#[derive(Debug, Clone, Default)]
pub struct Market {
    pub id: Option<String>,
    pub question: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Outcome prices as decimal strings; the first entry is the probability
    /// of the primary outcome.
    pub outcome_prices: Vec<String>,
    pub volume: Option<f64>,
    pub image: Option<String>,
    pub slug: Option<String>,
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// Derived content record shown to readers. Construction is total: every
/// field has a non-failing default, so an Article exists even for a Market
/// with nothing but a question.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: String,
    /// Primary outcome price as a percentage with one decimal place,
    /// or "N/A" when the price is missing or unparsable.
    pub probability: String,
    pub volume: f64,
    pub image: String,
    /// Unix seconds at the moment the article was generated.
    pub created_at: u64,
    pub market_url: String,
}
