//! Plain-text page fetcher

use crate::error::KnowledgeError;
use coursework_core::Backoff;
use std::time::Duration;
use tracing::{debug, info};

pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(120);

/// Pages serving the lesson context fail intermittently
pub const SCRAPE_BACKOFF: Backoff = Backoff::constant(3, Duration::from_millis(100));

pub struct Scraper {
    client: reqwest::Client,
    backoff: Backoff,
}

impl Scraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            backoff: SCRAPE_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Single attempt: the answer must be 200 with a `text/plain` body
    pub async fn fetch(&self, url: &str) -> Result<String, KnowledgeError> {
        debug!(url, "scraping");
        let request_failed = |source| KnowledgeError::Request {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .timeout(SCRAPE_TIMEOUT)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(KnowledgeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_plain_text(&content_type) {
            return Err(KnowledgeError::UnsupportedContentType {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(request_failed)
    }

    /// [`Scraper::fetch`] retried under the scraper's backoff
    pub async fn fetch_with_retry(&self, url: &str) -> Result<String, KnowledgeError> {
        let text = self.backoff.retry("scrape", move || self.fetch(url)).await?;
        info!(url, chars = text.chars().count(), "page scraped");
        Ok(text)
    }
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new()
    }
}

fn is_plain_text(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/plain"))
        .unwrap_or(false)
}
