//! HTTP page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use url::Url;

use super::PageFetcher;
use crate::error::{FetchError, FetchResult};
use crate::types::Page;
use crate::{html, urls};

/// Browser-like default user agent; some sites refuse obvious bots.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches pages over HTTP and extracts text + outbound link contexts.
///
/// A fixed per-request timeout bounds blocking time. The fetcher applies
/// no throttling of its own; the search controller owns politeness delays.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a custom reqwest client (pooling, proxy, TLS settings).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn classify(url: &Url, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Connection {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<Page> {
        debug!(url = %url, "fetching page");

        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| Self::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Final address after redirects is the base for link resolution
        let final_url = urls::normalize(response.url().clone());

        // reqwest falls back to UTF-8 when the charset is undetected
        let body = response.text().await.map_err(|e| FetchError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let links = html::extract_links(&final_url, &body);

        debug!(
            url = %final_url,
            bytes = body.len(),
            links = links.len(),
            "page fetched"
        );

        let mut page = Page::new(final_url, html::visible_text(&body))
            .with_links(links)
            .with_fetched_at(Utc::now());
        if let Some(title) = html::page_title(&body) {
            page = page.with_title(title);
        }

        Ok(page)
    }
}
