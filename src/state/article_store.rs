use std::sync::{Arc, RwLock};

use crate::types::Article;

/// In-memory holder of the currently published articles.
///
/// Exactly one writer (the refresher) and any number of readers (request
/// handlers). Each refresh replaces the whole sequence in a single
/// assignment, so readers always observe either the previous complete batch
/// or the next one, never a mix. Order follows the order markets were
/// returned by the source API.
pub struct ArticleStore {
    articles: RwLock<Vec<Article>>,
}

impl ArticleStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            articles: RwLock::new(Vec::new()),
        })
    }

    /// Replace the entire published sequence with a new batch.
    pub fn replace(&self, articles: Vec<Article>) {
        // A poisoned lock just means a reader panicked mid-read; the data is
        // still valid, so recover the guard instead of propagating the panic.
        let mut guard = self
            .articles
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = articles;
    }

    pub fn all(&self) -> Vec<Article> {
        self.read().clone()
    }

    /// Look up an article by id. Ids are compared loosely: an exact string
    /// match, or numeric equality when both sides parse as numbers, so the
    /// path parameter "42" matches a stored id sourced from a JSON number.
    pub fn find(&self, id: &str) -> Option<Article> {
        self.read().iter().find(|a| ids_match(&a.id, id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Article>> {
        self.articles
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ids_match(stored: &str, requested: &str) -> bool {
    if stored == requested {
        return true;
    }
    match (stored.parse::<f64>(), requested.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
