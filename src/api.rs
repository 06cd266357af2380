//! HTTP surface: the dashboard API plus health. One request, one pass over
//! the pipeline (normalize → filter → aggregate → export); no incremental
//! state beyond the cached article batch and the persisted rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::article::{normalize_batch, Article};
use crate::export::{csv, pdf, sheets::SpreadsheetWriter, CSV_FILENAME, PDF_FILENAME};
use crate::filter::{apply, FilterCriteria};
use crate::news::{fetch_or_empty, NewsSource};
use crate::payout::{aggregate, count_by_type, PayoutRow, TypeCount};
use crate::session::{coerce_rate, RateStore};

#[derive(Clone)]
pub struct AppState {
    articles: Arc<RwLock<Vec<Article>>>,
    rate_store: Arc<RateStore>,
    news: Arc<dyn NewsSource>,
    sheets: Arc<dyn SpreadsheetWriter>,
    // Serializes remote exports; a second click while one is in flight
    // must not race the same destination range.
    sheets_in_flight: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(
        rate_store: RateStore,
        news: Arc<dyn NewsSource>,
        sheets: Arc<dyn SpreadsheetWriter>,
    ) -> Self {
        Self {
            articles: Arc::new(RwLock::new(Vec::new())),
            rate_store: Arc::new(rate_store),
            news,
            sheets,
            sheets_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pre-seed the cached batch, used by tests and warm boots.
    pub fn with_articles(self, articles: Vec<Article>) -> Self {
        *self.articles.write().expect("articles rwlock poisoned") = articles;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/news", get(get_news))
        .route("/api/payouts", post(compute_payouts))
        .route("/api/rate", get(get_rate).put(put_rate))
        .route("/api/export/csv", post(export_csv))
        .route("/api/export/pdf", post(export_pdf))
        .route("/api/export/sheets", post(export_sheets))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Fetch top headlines, normalize, cache, return. Upstream failure shows
/// up as an empty list, never a 5xx.
async fn get_news(State(state): State<AppState>) -> Json<Vec<Article>> {
    counter!("news_fetch_total").increment(1);
    let raw = fetch_or_empty(state.news.as_ref()).await;
    let normalized = normalize_batch(raw);
    *state.articles.write().expect("articles rwlock poisoned") = normalized.clone();
    Json(normalized)
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PayoutReq {
    criteria: FilterCriteria,
    /// Number or numeric string; anything else coerces to 0. Missing falls
    /// back to the stored session rate.
    rate: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct PayoutResp {
    rows: Vec<PayoutRow>,
    type_counts: Vec<TypeCount>,
    article_count: usize,
    rate: f64,
}

async fn compute_payouts(
    State(state): State<AppState>,
    Json(req): Json<PayoutReq>,
) -> Json<PayoutResp> {
    let rate = match &req.rate {
        Some(v) => coerce_rate(v),
        None => state.rate_store.get(),
    };
    let filtered = {
        let articles = state.articles.read().expect("articles rwlock poisoned");
        apply(&articles, &req.criteria)
    };
    Json(PayoutResp {
        rows: aggregate(&filtered, rate),
        type_counts: count_by_type(&filtered),
        article_count: filtered.len(),
        rate,
    })
}

#[derive(Serialize)]
struct RateResp {
    rate: f64,
}

async fn get_rate(State(state): State<AppState>) -> Json<RateResp> {
    Json(RateResp {
        rate: state.rate_store.get(),
    })
}

async fn put_rate(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let rate = coerce_rate(body.get("rate").unwrap_or(&serde_json::Value::Null));
    if let Err(e) = state.rate_store.set(rate) {
        tracing::warn!(error = ?e, "persisting payout rate failed");
        return error_body(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"));
    }
    Json(RateResp { rate }).into_response()
}

/// Export adapters take the already-computed table; they never re-filter
/// or re-aggregate.
#[derive(Deserialize)]
struct ExportReq {
    rows: Vec<PayoutRow>,
}

async fn export_csv(Json(req): Json<ExportReq>) -> Response {
    counter!("export_csv_total").increment(1);
    let body = csv::render(&req.rows);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILENAME}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export_pdf(Json(req): Json<ExportReq>) -> Response {
    counter!("export_pdf_total").increment(1);
    let body = pdf::render(&req.rows);
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PDF_FILENAME}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[derive(Deserialize)]
struct SheetsExportReq {
    #[serde(alias = "sheetId")]
    sheet_id: String,
    rows: Vec<PayoutRow>,
}

#[derive(Serialize)]
struct SheetsExportResp {
    message: String,
}

/// Releases the in-flight flag on every exit path. The handler future is
/// dropped when the client disconnects mid-export; a plain store after the
/// `.await` would never run and the guard would stay wedged.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

async fn export_sheets(
    State(state): State<AppState>,
    Json(req): Json<SheetsExportReq>,
) -> Response {
    counter!("export_sheets_total").increment(1);

    if state
        .sheets_in_flight
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        counter!("export_sheets_busy_total").increment(1);
        return error_body(StatusCode::CONFLICT, "spreadsheet export already in progress");
    }
    let _in_flight = InFlightGuard(state.sheets_in_flight.clone());

    let result = state.sheets.overwrite(&req.sheet_id, &req.rows).await;

    match result {
        Ok(()) => Json(SheetsExportResp {
            message: "Exported to spreadsheet".to_string(),
        })
        .into_response(),
        Err(e) => {
            counter!("export_sheets_errors_total").increment(1);
            tracing::warn!(error = ?e, sheet_id = %req.sheet_id, "spreadsheet export failed");
            error_body(StatusCode::BAD_GATEWAY, format!("{e:#}"))
        }
    }
}
