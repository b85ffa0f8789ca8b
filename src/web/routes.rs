use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use crate::state::ArticleStore;
use crate::types::Article;
use crate::web::templates;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArticleStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/article/:id", get(article_detail))
        .fallback_service(ServeDir::new("public"))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let articles = state.store.all();
    let (featured, recent) = home_slices(&articles);
    Html(templates::index_page(featured, recent, &articles))
}

/// Detail lookup by id. A miss is not an error: the reader is sent back to
/// the homepage instead of a 404.
async fn article_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.find(&id) {
        Some(article) => Html(templates::article_page(&article)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// Homepage slicing: article 0 is featured, articles 1 through 5 inclusive
/// are "recent" (fewer when the store is shorter).
pub fn home_slices(articles: &[Article]) -> (Option<&Article>, &[Article]) {
    let featured = articles.first();
    let recent = if articles.len() > 1 {
        &articles[1..articles.len().min(6)]
    } else {
        &[]
    };
    (featured, recent)
}
