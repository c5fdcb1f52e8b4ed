//! Testing utilities including mock implementations.
//!
//! Useful for exercising the search loop without network access or a real
//! classifier artifact.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use url::Url;

use crate::error::{ClassifierError, ClassifierResult, FetchError, FetchResult};
use crate::fetch::PageFetcher;
use crate::score::TextClassifier;
use crate::types::{LinkContext, Page};
use crate::urls;

/// Failure a [`MockFetcher`] should produce for a URL.
#[derive(Debug, Clone, Copy)]
pub enum ScriptedFailure {
    /// Per-request timeout elapsed
    Timeout,

    /// Connection refused/reset
    Connection,

    /// Non-2xx response with this status
    HttpStatus(u16),

    /// Body could not be processed
    Parse,
}

impl ScriptedFailure {
    fn into_error(self, url: &str) -> FetchError {
        match self {
            ScriptedFailure::Timeout => FetchError::Timeout { url: url.into() },
            ScriptedFailure::Connection => FetchError::Connection {
                url: url.into(),
                reason: "connection refused".into(),
            },
            ScriptedFailure::HttpStatus(status) => FetchError::HttpStatus {
                url: url.into(),
                status,
            },
            ScriptedFailure::Parse => FetchError::Parse {
                url: url.into(),
                reason: "unreadable body".into(),
            },
        }
    }
}

/// A fetcher serving predefined pages, with call tracking.
#[derive(Default)]
pub struct MockFetcher {
    pages: RwLock<HashMap<String, Page>>,
    failures: RwLock<HashMap<String, ScriptedFailure>>,
    calls: RwLock<Vec<String>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this page for its own URL.
    pub fn with_page(self, page: Page) -> Self {
        let key = urls::normalize(page.url.clone()).to_string();
        self.pages.write().unwrap().insert(key, page);
        self
    }

    /// Fail this URL with the given failure.
    pub fn fail_url(self, url: &str, failure: ScriptedFailure) -> Self {
        let key = urls::normalize(Url::parse(url).unwrap()).to_string();
        self.failures.write().unwrap().insert(key, failure);
        self
    }

    /// URLs fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// How many times a URL was fetched.
    pub fn fetch_count(&self, url: &str) -> usize {
        let key = urls::normalize(Url::parse(url).unwrap()).to_string();
        self.calls.read().unwrap().iter().filter(|c| **c == key).count()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<Page> {
        let key = urls::normalize(url.clone()).to_string();
        self.calls.write().unwrap().push(key.clone());

        if let Some(failure) = self.failures.read().unwrap().get(&key) {
            return Err(failure.into_error(&key));
        }

        self.pages
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or(FetchError::HttpStatus {
                url: key,
                status: 404,
            })
    }
}

/// Builder wiring a small site of interlinked pages into a [`MockFetcher`].
///
/// Link targets are resolved against the page they appear on, so relative
/// paths work the way they would in real HTML.
pub struct SiteBuilder {
    base: Url,
    fetcher: MockFetcher,
}

impl SiteBuilder {
    /// Start a site rooted at a base URL.
    pub fn new(base: &str) -> Self {
        Self {
            base: Url::parse(base).unwrap(),
            fetcher: MockFetcher::new(),
        }
    }

    /// Add a page at `path` with visible text and `(href, anchor text)`
    /// outbound links.
    pub fn page(self, path: &str, text: &str, links: &[(&str, &str)]) -> Self {
        self.page_with_paragraphs(
            path,
            text,
            &links.iter().map(|&(h, t)| (h, t, "")).collect::<Vec<_>>(),
        )
    }

    /// Add a page whose links also carry enclosing-paragraph text.
    pub fn page_with_paragraphs(mut self, path: &str, text: &str, links: &[(&str, &str, &str)]) -> Self {
        let url = urls::normalize(self.base.join(path).unwrap());

        let contexts: Vec<LinkContext> = links
            .iter()
            .filter_map(|&(href, anchor, paragraph)| {
                urls::resolve(&url, href)
                    .map(|target| LinkContext::new(target, anchor).with_paragraph(paragraph))
            })
            .collect();

        let page = Page::new(url, text).with_links(contexts);
        self.fetcher = self.fetcher.with_page(page);
        self
    }

    /// Fail a path with the given failure.
    pub fn failing(mut self, path: &str, failure: ScriptedFailure) -> Self {
        let url = urls::normalize(self.base.join(path).unwrap());
        self.fetcher = self.fetcher.fail_url(url.as_str(), failure);
        self
    }

    /// Finish and return the fetcher.
    pub fn build(self) -> MockFetcher {
        self.fetcher
    }
}

/// A classifier returning scripted probabilities.
#[derive(Default)]
pub struct MockClassifier {
    responses: RwLock<HashMap<String, f64>>,
    default_probability: f64,
    failing: RwLock<Vec<String>>,
}

impl MockClassifier {
    /// Create a classifier that answers `default_probability` for
    /// everything not scripted.
    pub fn new(default_probability: f64) -> Self {
        Self {
            default_probability,
            ..Default::default()
        }
    }

    /// Answer `probability` whenever the input contains `needle`.
    pub fn with_probability(self, needle: &str, probability: f64) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(needle.to_lowercase(), probability);
        self
    }

    /// Fail whenever the input contains `needle`.
    pub fn failing_on(self, needle: &str) -> Self {
        self.failing.write().unwrap().push(needle.to_lowercase());
        self
    }
}

impl TextClassifier for MockClassifier {
    fn predict_probability(&self, text: &str) -> ClassifierResult<f64> {
        let haystack = text.to_lowercase();

        if self
            .failing
            .read()
            .unwrap()
            .iter()
            .any(|needle| haystack.contains(needle))
        {
            return Err(ClassifierError::Prediction {
                reason: "scripted failure".into(),
            });
        }

        Ok(self
            .responses
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| haystack.contains(needle.as_str()))
            .map(|(_, &p)| p)
            .unwrap_or(self.default_probability))
    }
}
