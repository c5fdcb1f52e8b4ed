//! Page fetching.
//!
//! The search loop only ever sees [`PageFetcher`]; the HTTP implementation
//! lives in [`http`], and `testing::MockFetcher` provides a scriptable
//! stand-in for tests.

pub mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use url::Url;

use crate::error::FetchResult;
use crate::types::Page;

/// Turns a URL into page text plus outbound links, or a classified failure.
///
/// Implementations never panic across this boundary: every transport or
/// processing failure is reported as a [`FetchError`](crate::FetchError).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page.
    async fn fetch(&self, url: &Url) -> FetchResult<Page>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    async fn fetch(&self, url: &Url) -> FetchResult<Page> {
        (**self).fetch(url).await
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    async fn fetch(&self, url: &Url) -> FetchResult<Page> {
        (**self).fetch(url).await
    }
}
