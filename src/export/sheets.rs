//! Remote-spreadsheet adapter. Overwrites a fixed range anchored at `A1`
//! of the destination spreadsheet with the payout table. The only adapter
//! that performs network I/O; credentials stay server-side behind an
//! injected token provider and are never handed to the caller.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::export::{row_cells, HEADER};
use crate::payout::PayoutRow;

/// Range anchor; the update overwrites from here, it never appends.
pub const RANGE: &str = "A1";

/// Server-held credential seam. Tests inject a static token, production
/// reads the environment; no credential material touches the filesystem.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

pub struct EnvTokenProvider;

#[async_trait]
impl AccessTokenProvider for EnvTokenProvider {
    async fn access_token(&self) -> Result<String> {
        std::env::var("SHEETS_ACCESS_TOKEN")
            .context("SHEETS_ACCESS_TOKEN is not set")
    }
}

/// Fixed token for tests and tools.
pub struct StaticTokenProvider(pub String);

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// The write seam the API layer depends on; mocked in tests.
#[async_trait]
pub trait SpreadsheetWriter: Send + Sync {
    async fn overwrite(&self, sheet_id: &str, rows: &[PayoutRow]) -> Result<()>;
}

/// Header + one row of display cells per entry, the shape the values
/// endpoint expects.
pub fn values(rows: &[PayoutRow]) -> Vec<Vec<String>> {
    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(HEADER.iter().map(|h| h.to_string()).collect());
    for row in rows {
        out.push(row_cells(row).to_vec());
    }
    out
}

pub struct HttpSpreadsheetWriter {
    client: Client,
    api_base: String,
    tokens: Box<dyn AccessTokenProvider>,
}

impl HttpSpreadsheetWriter {
    pub fn new(api_base: String, tokens: Box<dyn AccessTokenProvider>) -> Self {
        Self {
            client: Client::new(),
            api_base,
            tokens,
        }
    }
}

#[async_trait]
impl SpreadsheetWriter for HttpSpreadsheetWriter {
    async fn overwrite(&self, sheet_id: &str, rows: &[PayoutRow]) -> Result<()> {
        if sheet_id.trim().is_empty() {
            bail!("destination spreadsheet id is empty");
        }
        let token = self.tokens.access_token().await?;
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}?valueInputOption=USER_ENTERED",
            self.api_base.trim_end_matches('/'),
            sheet_id,
            RANGE
        );
        let body = serde_json::json!({
            "range": RANGE,
            "majorDimension": "ROWS",
            "values": values(rows),
        });

        self.client
            .put(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .context("spreadsheet update request")?
            .error_for_status()
            .context("spreadsheet update non-2xx")?;
        Ok(())
    }
}
