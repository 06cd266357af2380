//! News source: top-headlines fetch behind a provider trait so tests can
//! inject fixtures. Upstream failures are swallowed into an empty list and
//! logged; the dashboard renders "no articles" instead of crashing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::article::RawArticle;

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn top_headlines(&self) -> Result<Vec<RawArticle>>;
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// Live client for the headlines endpoint (country=us, pageSize=10).
pub struct HttpNewsSource {
    client: Client,
    api_base: String,
    api_key: String,
}

impl HttpNewsSource {
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key,
        }
    }
}

#[async_trait]
impl NewsSource for HttpNewsSource {
    async fn top_headlines(&self) -> Result<Vec<RawArticle>> {
        let url = format!(
            "{}/v2/top-headlines?country=us&pageSize=10&apiKey={}",
            self.api_base.trim_end_matches('/'),
            self.api_key
        );
        let resp: HeadlinesResponse = self
            .client
            .get(&url)
            .send()
            .await
            .context("headlines request")?
            .error_for_status()
            .context("headlines non-2xx")?
            .json()
            .await
            .context("headlines json")?;
        Ok(resp.articles)
    }
}

/// Fixture source for tests: yields a canned batch, or an error.
pub struct FixtureNewsSource {
    pub articles: Vec<RawArticle>,
}

#[async_trait]
impl NewsSource for FixtureNewsSource {
    async fn top_headlines(&self) -> Result<Vec<RawArticle>> {
        Ok(self.articles.clone())
    }
}

/// Fetch and swallow: provider errors become an empty batch plus a warning,
/// matching the source's behavior of rendering an empty dashboard.
pub async fn fetch_or_empty(source: &dyn NewsSource) -> Vec<RawArticle> {
    match source.top_headlines().await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!(error = ?e, "news fetch failed, returning empty batch");
            metrics::counter!("news_fetch_errors_total").increment(1);
            Vec::new()
        }
    }
}
