use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("news_fetch_total", "Headline fetches attempted.");
        describe_counter!("news_fetch_errors_total", "Headline fetches that failed.");
        describe_counter!("export_csv_total", "CSV exports served.");
        describe_counter!("export_pdf_total", "PDF exports served.");
        describe_counter!("export_sheets_total", "Spreadsheet exports attempted.");
        describe_counter!(
            "export_sheets_errors_total",
            "Spreadsheet exports that failed."
        );
        describe_counter!(
            "export_sheets_busy_total",
            "Spreadsheet exports rejected by the in-flight guard."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");
        ensure_described();
        Self { handle }
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
