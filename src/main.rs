mod config;
mod error;
mod fetcher;
mod generator;
mod refresh;
mod state;
mod types;
mod web;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::generator::ArticleGenerator;
use crate::refresh::ArticleRefresher;
use crate::state::ArticleStore;
use crate::web::routes::{router, AppState};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // Strategy is decided once here and never re-checked per call.
    let generator = ArticleGenerator::from_config(&cfg)?;
    if generator.is_ai() {
        info!("ANTHROPIC_API_KEY set, AI summaries enabled");
    } else {
        info!("ANTHROPIC_API_KEY not set, using plain summaries");
    }

    let store = ArticleStore::new();

    let refresher = ArticleRefresher::new(cfg.clone(), Arc::clone(&store), generator);
    tokio::spawn(async move { refresher.run().await });

    let app = router(AppState { store });
    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Polymarket Times running on http://localhost:{}", cfg.port);

    axum::serve(listener, app).await?;

    Ok(())
}
