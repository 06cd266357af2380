//! Newsroom Payouts — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and the static
//! dashboard UI.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::services::ServeDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsroom_payouts::api::{self, AppState};
use newsroom_payouts::config::Config;
use newsroom_payouts::export::sheets::{EnvTokenProvider, HttpSpreadsheetWriter};
use newsroom_payouts::metrics::Metrics;
use newsroom_payouts::news::HttpNewsSource;
use newsroom_payouts::session::RateStore;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newsroom_payouts=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the vars come from the platform.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = Config::from_env();
    let metrics = Metrics::init();

    let news = Arc::new(HttpNewsSource::new(
        cfg.news_api_base.clone(),
        cfg.news_api_key.clone(),
    ));
    let sheets = Arc::new(HttpSpreadsheetWriter::new(
        cfg.sheets_api_base.clone(),
        Box::new(EnvTokenProvider),
    ));
    let state = AppState::new(RateStore::open(&cfg.rate_store_path), news, sheets);

    let app = api::router(state)
        .merge(metrics.router())
        .fallback_service(ServeDir::new(&cfg.static_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "payout dashboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
