//! The priority-driven search controller.
//!
//! Owns all search state (visited set, parent/depth maps, frontier) as a
//! single writer. The page fetch is the only suspension point; with
//! `fetch_concurrency > 1` up to N fetches are polled concurrently while
//! every state mutation still happens here, so the single-writer invariant
//! holds in both modes.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SearchError, SearchResult};
use crate::fetch::PageFetcher;
use crate::frontier::{Frontier, FrontierNode};
use crate::goal::GoalMatcher;
use crate::score::RelevanceScorer;
use crate::types::{AdmissionPolicy, LinkContext, Page, SearchConfig, SearchReport, Termination};
use crate::urls::{self, UrlScope};

/// Search state, owned exclusively by the controller while a run is in
/// progress.
#[derive(Default)]
struct SearchState {
    /// Addresses handed to the fetcher; grows monotonically, an address is
    /// expanded at most once
    visited: HashSet<Url>,

    /// First-discovery parent per address; the seed maps to `None` and no
    /// entry is ever overwritten
    parent: HashMap<Url, Option<Url>>,

    /// Discovery depth per address, assigned alongside `parent`
    depth: HashMap<Url, usize>,

    /// Discovered-but-unexpanded nodes; may hold stale duplicates
    frontier: Frontier<Url>,

    /// Units of page budget spent
    pages_charged: usize,

    /// Successfully expanded pages, for progress traces
    expanded: usize,
}

/// Best-first search over a lazily-discovered web graph.
///
/// Generic over the fetcher and the relevance scorer, so both the HTTP
/// transport and the scoring strategy swap without touching the loop.
pub struct Searcher<F: PageFetcher, S: RelevanceScorer> {
    fetcher: F,
    scorer: S,
    config: SearchConfig,
}

impl<F: PageFetcher, S: RelevanceScorer> Searcher<F, S> {
    /// Create a searcher.
    pub fn new(fetcher: F, scorer: S, config: SearchConfig) -> Self {
        Self {
            fetcher,
            scorer,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search to a terminal state.
    ///
    /// Returns `Err` only for configuration errors and an unreachable
    /// seed; every other failure is absorbed by the per-node policy and
    /// ends in a [`SearchReport`].
    pub async fn run(&self) -> SearchResult<SearchReport> {
        let seed = urls::normalize(self.config.validate()?);
        let goal = GoalMatcher::new(&self.config.target_phrase)?;
        let scope = match &self.config.base_domain {
            Some(domain) => UrlScope::new(domain.clone()),
            None => UrlScope::from_seed(&seed),
        };

        let started = Instant::now();
        let mut state = SearchState::default();
        state.parent.insert(seed.clone(), None);
        state.depth.insert(seed.clone(), 0);
        state
            .frontier
            .push(FrontierNode::new(seed.clone(), 0.0, 0.0));

        info!(
            seed = %seed,
            target = %self.config.target_phrase,
            domain = scope.base_domain(),
            "search starting"
        );

        let mut in_flight = FuturesUnordered::new();
        let mut dispatched_any = false;

        loop {
            if let Some(budget) = self.config.max_elapsed {
                if started.elapsed() >= budget {
                    info!(pages = state.pages_charged, "wall-clock budget exhausted");
                    return Ok(self.report(Termination::TimeLimitReached, None, &state, started));
                }
            }

            // Refill the in-flight window from the frontier, discarding
            // stale duplicates without consuming budget.
            while in_flight.len() < self.config.fetch_concurrency
                && state.pages_charged + in_flight.len() < self.config.max_pages
            {
                let Some(node) = state.frontier.pop() else {
                    break;
                };
                if !state.visited.insert(node.address.clone()) {
                    continue; // stale duplicate
                }

                if dispatched_any {
                    if let Some(delay) = self.config.fetch_delay {
                        tokio::time::sleep(delay).await;
                    }
                }
                dispatched_any = true;

                let depth = state.depth.get(&node.address).copied().unwrap_or(0);
                let address = node.address.clone();
                let fetcher = &self.fetcher;
                debug!(url = %address, total = node.total_relevance(), "fetch dispatched");
                in_flight.push(async move {
                    let outcome = fetcher.fetch(&address).await;
                    (address, depth, outcome)
                });
            }

            if in_flight.is_empty() {
                let termination = if state.frontier.is_empty() {
                    Termination::FrontierEmpty
                } else {
                    Termination::PageLimitReached
                };
                info!(
                    reason = termination.label(),
                    pages = state.pages_charged,
                    "search exhausted"
                );
                return Ok(self.report(termination, None, &state, started));
            }

            let Some((address, depth, outcome)) = in_flight.next().await else {
                continue;
            };

            match outcome {
                Err(error) => {
                    if address == seed {
                        warn!(url = %address, error = %error, "seed page unreachable, aborting");
                        return Err(SearchError::SeedUnreachable(error));
                    }
                    warn!(url = %address, error = %error, "skipping unreachable page");
                    if self.config.count_failed_fetches {
                        state.pages_charged += 1;
                    }
                }
                Ok(page) => {
                    state.pages_charged += 1;
                    state.expanded += 1;
                    info!(step = state.expanded, url = %address, "exploring page");

                    if goal.matches(&page.text) {
                        info!(
                            url = %address,
                            pages = state.pages_charged,
                            "target phrase found"
                        );
                        return Ok(self.report(
                            Termination::GoalFound,
                            Some(address),
                            &state,
                            started,
                        ));
                    }

                    self.expand(&page, &address, depth, &scope, &mut state);
                }
            }
        }
    }

    /// Admit children of an expanded page into the frontier.
    fn expand(
        &self,
        page: &Page,
        parent_address: &Url,
        current_depth: usize,
        scope: &UrlScope,
        state: &mut SearchState,
    ) {
        let child_depth = current_depth + 1;
        let cumulative = -(self.config.depth_penalty_per_level * child_depth as f64);

        let mut seen_on_page: HashSet<&Url> = HashSet::new();
        let mut admitted = 0usize;

        match self.config.admission {
            AdmissionPolicy::Streaming => {
                for link in &page.links {
                    if admitted >= self.config.max_children_per_page {
                        break;
                    }
                    if !self.admissible(link, scope, state) || !seen_on_page.insert(&link.url) {
                        continue;
                    }
                    let score = self.scorer.score(link, &page.links, Some(page.text.as_str()));
                    self.admit(link, parent_address, child_depth, cumulative, score, state);
                    admitted += 1;
                }
            }
            AdmissionPolicy::RankThenCap => {
                let mut scored: Vec<(f64, &LinkContext)> = Vec::new();
                for link in &page.links {
                    if !self.admissible(link, scope, state) || !seen_on_page.insert(&link.url) {
                        continue;
                    }
                    scored.push((self.scorer.score(link, &page.links, Some(page.text.as_str())), link));
                }
                // Stable sort: equal scores keep page order
                scored.sort_by(|a, b| b.0.total_cmp(&a.0));
                for (score, link) in scored
                    .into_iter()
                    .take(self.config.max_children_per_page)
                {
                    self.admit(link, parent_address, child_depth, cumulative, score, state);
                    admitted += 1;
                }
            }
        }

        debug!(
            url = %parent_address,
            admitted,
            candidates = page.links.len(),
            "children admitted"
        );
    }

    /// A candidate survives when it is in scope, crawlable, not yet
    /// visited, and undiscovered (first-discovery-wins: an address with a
    /// recorded parent is skipped entirely, not re-scored).
    fn admissible(&self, link: &LinkContext, scope: &UrlScope, state: &SearchState) -> bool {
        scope.contains(&link.url)
            && urls::is_crawlable(&link.url)
            && !state.visited.contains(&link.url)
            && !state.parent.contains_key(&link.url)
    }

    fn admit(
        &self,
        link: &LinkContext,
        parent_address: &Url,
        depth: usize,
        cumulative: f64,
        heuristic: f64,
        state: &mut SearchState,
    ) {
        state
            .parent
            .insert(link.url.clone(), Some(parent_address.clone()));
        state.depth.insert(link.url.clone(), depth);
        state
            .frontier
            .push(FrontierNode::new(link.url.clone(), cumulative, heuristic));
    }

    fn report(
        &self,
        termination: Termination,
        goal: Option<Url>,
        state: &SearchState,
        started: Instant,
    ) -> SearchReport {
        let path = goal.as_ref().map(|g| reconstruct_path(&state.parent, g));
        SearchReport {
            termination,
            goal,
            path,
            pages_visited: state.pages_charged,
            elapsed: started.elapsed(),
        }
    }
}

/// Walk the parent map from the goal back to the seed sentinel, then
/// reverse. Terminates because each parent link strictly decreases depth.
fn reconstruct_path(parent: &HashMap<Url, Option<Url>>, goal: &Url) -> Vec<Url> {
    let mut path = Vec::new();
    let mut current = Some(goal.clone());

    while let Some(address) = current {
        current = parent.get(&address).cloned().flatten();
        path.push(address);
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{FeatureWeights, LexicalScorer};
    use crate::testing::SiteBuilder;

    fn scorer(keyword: &str) -> LexicalScorer {
        LexicalScorer::new([keyword], FeatureWeights::ANCHOR_HEAVY)
    }

    #[tokio::test]
    async fn test_goal_on_seed_is_found_without_expansion() {
        let fetcher = SiteBuilder::new("https://example.com")
            .page("/", "welcome, the secret prize is here", &[("/a", "a link")])
            .build();

        let config = SearchConfig::new("https://example.com/", "secret prize");
        let searcher = Searcher::new(fetcher, scorer("prize"), config);

        let report = searcher.run().await.unwrap();
        assert_eq!(report.termination, Termination::GoalFound);
        assert_eq!(report.pages_visited, 1);
        let path = report.path.unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].as_str(), "https://example.com/");
    }

    #[tokio::test]
    async fn test_repeated_link_on_page_admitted_once() {
        let fetcher = SiteBuilder::new("https://example.com")
            .page(
                "/",
                "home",
                &[("/a", "target"), ("/a", "target again"), ("/a#frag", "same")],
            )
            .page("/a", "nothing here", &[])
            .build();

        let config = SearchConfig::new("https://example.com/", "unfindable");
        let searcher = Searcher::new(fetcher, scorer("target"), config);

        let report = searcher.run().await.unwrap();
        assert_eq!(report.termination, Termination::FrontierEmpty);
        // Seed plus exactly one fetch of /a
        assert_eq!(report.pages_visited, 2);
    }

    #[tokio::test]
    async fn test_reconstruct_path_orders_seed_first() {
        let seed = Url::parse("https://example.com/").unwrap();
        let mid = Url::parse("https://example.com/mid").unwrap();
        let goal = Url::parse("https://example.com/goal").unwrap();

        let mut parent = HashMap::new();
        parent.insert(seed.clone(), None);
        parent.insert(mid.clone(), Some(seed.clone()));
        parent.insert(goal.clone(), Some(mid.clone()));

        assert_eq!(reconstruct_path(&parent, &goal), vec![seed, mid, goal]);
    }
}
