//! Naive depth-first probe.
//!
//! A deliberately simple fallback, separate from the priority-driven
//! search: follow in-scope links depth-first until the goal matcher fires
//! or the depth/page bounds are hit. Useful as a baseline and for very
//! small sites; it makes no attempt to visit promising pages first.

use std::collections::HashSet;

use futures::future::BoxFuture;
use tracing::warn;
use url::Url;

use crate::fetch::PageFetcher;
use crate::goal::GoalMatcher;
use crate::urls::{self, UrlScope};

/// Depth-first search for a page matching the goal.
///
/// Returns the first matching address found, visiting at most `max_pages`
/// pages and descending at most `max_depth` levels below the seed.
pub async fn depth_first_probe<F: PageFetcher>(
    fetcher: &F,
    seed: &Url,
    goal: &GoalMatcher,
    scope: &UrlScope,
    max_depth: usize,
    max_pages: usize,
) -> Option<Url> {
    let mut visited = HashSet::new();
    probe(
        fetcher,
        urls::normalize(seed.clone()),
        goal,
        scope,
        max_depth,
        max_pages,
        &mut visited,
    )
    .await
}

fn probe<'a, F: PageFetcher>(
    fetcher: &'a F,
    address: Url,
    goal: &'a GoalMatcher,
    scope: &'a UrlScope,
    depth_left: usize,
    max_pages: usize,
    visited: &'a mut HashSet<Url>,
) -> BoxFuture<'a, Option<Url>> {
    Box::pin(async move {
        if visited.len() >= max_pages || !visited.insert(address.clone()) {
            return None;
        }

        let page = match fetcher.fetch(&address).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %address, error = %e, "skipping unreachable page");
                return None;
            }
        };

        if goal.matches(&page.text) {
            return Some(address);
        }

        if depth_left == 0 {
            return None;
        }

        for link in &page.links {
            if !scope.contains(&link.url)
                || !urls::is_crawlable(&link.url)
                || visited.contains(&link.url)
            {
                continue;
            }

            let found = probe(
                fetcher,
                link.url.clone(),
                goal,
                scope,
                depth_left - 1,
                max_pages,
                visited,
            )
            .await;

            if found.is_some() {
                return found;
            }
        }

        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SiteBuilder;

    #[tokio::test]
    async fn test_finds_goal_depth_first() {
        let fetcher = SiteBuilder::new("https://example.com")
            .page("/", "home", &[("/a", "a"), ("/b", "b")])
            .page("/a", "nothing", &[("/a/deep", "deeper")])
            .page("/a/deep", "the treasure room", &[])
            .page("/b", "also treasure room here", &[])
            .build();

        let goal = GoalMatcher::new("treasure room").unwrap();
        let scope = UrlScope::new("example.com");
        let seed = Url::parse("https://example.com/").unwrap();

        // Depth-first order reaches /a/deep before /b
        let found = depth_first_probe(&fetcher, &seed, &goal, &scope, 3, 10)
            .await
            .unwrap();
        assert_eq!(found.as_str(), "https://example.com/a/deep");
    }

    #[tokio::test]
    async fn test_depth_bound_respected() {
        let fetcher = SiteBuilder::new("https://example.com")
            .page("/", "home", &[("/a", "a")])
            .page("/a", "mid", &[("/a/deep", "deeper")])
            .page("/a/deep", "the treasure room", &[])
            .build();

        let goal = GoalMatcher::new("treasure room").unwrap();
        let scope = UrlScope::new("example.com");
        let seed = Url::parse("https://example.com/").unwrap();

        let found = depth_first_probe(&fetcher, &seed, &goal, &scope, 1, 10).await;
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_page_budget_respected() {
        let fetcher = SiteBuilder::new("https://example.com")
            .page("/", "home", &[("/a", "a"), ("/b", "b"), ("/c", "c")])
            .page("/a", "one", &[])
            .page("/b", "two", &[])
            .page("/c", "the treasure room", &[])
            .build();

        let goal = GoalMatcher::new("treasure room").unwrap();
        let scope = UrlScope::new("example.com");
        let seed = Url::parse("https://example.com/").unwrap();

        // Budget of 3 pages covers seed, /a and /b; /c is never reached
        let found = depth_first_probe(&fetcher, &seed, &goal, &scope, 2, 3).await;
        assert!(found.is_none());
        assert_eq!(fetcher.fetched().len(), 3);
    }
}
