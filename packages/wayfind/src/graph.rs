//! Offline graph variant.
//!
//! An alternate entry point that searches a pre-crawled, materialized page
//! graph instead of fetching live. Nodes may cache a page body; edges
//! carry the link text and surrounding paragraph they were discovered
//! with. Heuristic scores are derived per destination node by taking the
//! **maximum** over all incoming edges, so any single strong piece of
//! evidence is enough to promote a node.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::GraphStoreError;
use crate::fetch::PageFetcher;
use crate::frontier::{Frontier, FrontierNode};
use crate::goal::GoalMatcher;
use crate::score::FeatureWeights;
use crate::urls;

/// A node in the materialized graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageNode {
    /// Cached page body, when the crawl kept it
    pub body: Option<String>,
}

/// A directed edge discovered from one page to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEdge {
    /// Source node address
    pub from: String,

    /// Destination node address
    pub to: String,

    /// Anchor text the link was discovered with
    pub link_text: String,

    /// Surrounding paragraph text at the discovery site
    pub paragraph: String,

    /// Cached body of the source page at crawl time, when kept
    pub body: Option<String>,
}

/// A pre-crawled directed page graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageGraph {
    nodes: HashMap<String, PageNode>,
    edges: Vec<PageEdge>,
}

impl PageGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a node exists.
    pub fn add_node(&mut self, address: impl Into<String>) {
        self.nodes.entry(address.into()).or_default();
    }

    /// Set a node's cached body, creating the node if needed.
    pub fn set_body(&mut self, address: impl Into<String>, body: impl Into<String>) {
        self.nodes.entry(address.into()).or_default().body = Some(body.into());
    }

    /// Add a directed edge, creating endpoints as needed.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        link_text: impl Into<String>,
        paragraph: impl Into<String>,
        body: Option<String>,
    ) {
        let from = from.into();
        let to = to.into();
        self.add_node(from.clone());
        self.add_node(to.clone());
        self.edges.push(PageEdge {
            from,
            to,
            link_text: link_text.into(),
            paragraph: paragraph.into(),
            body,
        });
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True iff the address is a known node.
    pub fn contains(&self, address: &str) -> bool {
        self.nodes.contains_key(address)
    }

    /// Cached body of a node, if any.
    pub fn body(&self, address: &str) -> Option<&str> {
        self.nodes.get(address).and_then(|n| n.body.as_deref())
    }

    /// Outgoing edges of a node.
    pub fn out_edges<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a PageEdge> + 'a {
        self.edges.iter().filter(move |e| e.from == address)
    }

    /// Derive per-node heuristic scores for a keyword.
    ///
    /// Each edge is scored from its own evidence: keyword occurrences in
    /// the link text, the surrounding paragraph, and a body (the edge's
    /// cached body, else the destination node's, else the source node's),
    /// plus the number of the source's out-neighbors whose address mentions
    /// the keyword. Per destination, the maximum incoming edge score wins.
    pub fn heuristic_scores(&self, keyword: &str, weights: FeatureWeights) -> HashMap<String, f64> {
        let needle = keyword.to_lowercase();
        let mut scores: HashMap<String, f64> = HashMap::new();

        for edge in &self.edges {
            let link_hits = occurrences(&edge.link_text, &needle);
            let paragraph_hits = occurrences(&edge.paragraph, &needle);

            let body = edge
                .body
                .as_deref()
                .or_else(|| self.body(&edge.to))
                .or_else(|| self.body(&edge.from))
                .unwrap_or("");
            let body_hits = occurrences(body, &needle);

            let sibling_hits = self
                .out_edges(&edge.from)
                .filter(|other| other.to.to_lowercase().contains(&needle))
                .count();

            let score = weights.link_text * link_hits as f64
                + weights.paragraph * paragraph_hits as f64
                + weights.body * body_hits as f64
                + weights.siblings * sibling_hits as f64;

            let entry = scores.entry(edge.to.clone()).or_insert(f64::NEG_INFINITY);
            *entry = entry.max(score);
        }

        scores
    }

    /// Greedy best-first search over the materialized graph.
    ///
    /// Orders the frontier by heuristic score alone. A node is the goal
    /// when the goal matcher fires on its cached body, or when its address
    /// equals `goal` exactly. Parent assignment is first-discovery-wins,
    /// as in the live search. Returns the path from `start`, or `None`.
    pub fn best_first(
        &self,
        start: &str,
        goal: &str,
        scores: &HashMap<String, f64>,
    ) -> Option<Vec<String>> {
        if !self.contains(start) {
            return None;
        }

        let matcher = GoalMatcher::new(goal).ok();
        let is_goal = |address: &str| -> bool {
            if address == goal {
                return true;
            }
            match (&matcher, self.body(address)) {
                (Some(m), Some(body)) => m.matches(body),
                _ => false,
            }
        };

        let mut frontier: Frontier<String> = Frontier::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut parent: HashMap<String, Option<String>> = HashMap::new();

        parent.insert(start.to_string(), None);
        frontier.push(FrontierNode::new(
            start.to_string(),
            0.0,
            scores.get(start).copied().unwrap_or(0.0),
        ));

        while let Some(node) = frontier.pop() {
            let address = node.address;
            if !visited.insert(address.clone()) {
                continue;
            }

            debug!(node = %address, h = node.heuristic_relevance, "expanding graph node");

            if is_goal(&address) {
                let mut path = Vec::new();
                let mut current = Some(address);
                while let Some(step) = current {
                    current = parent.get(&step).cloned().flatten();
                    path.push(step);
                }
                path.reverse();
                return Some(path);
            }

            for edge in self.out_edges(&address) {
                if visited.contains(&edge.to) || parent.contains_key(&edge.to) {
                    continue;
                }
                parent.insert(edge.to.clone(), Some(address.clone()));
                frontier.push(FrontierNode::new(
                    edge.to.clone(),
                    0.0,
                    scores.get(&edge.to).copied().unwrap_or(0.0),
                ));
            }
        }

        None
    }

    /// Materialize a graph by live crawling from a seed, breadth-first to
    /// a depth bound.
    ///
    /// Bodies are cached on nodes; each discovered link becomes an edge
    /// carrying its anchor text and surrounding paragraph. Unreachable
    /// pages are logged and skipped (their nodes stay body-less).
    pub async fn from_crawl<F: PageFetcher>(fetcher: &F, seed: &Url, max_depth: usize) -> Self {
        let mut graph = Self::new();
        let seed = urls::normalize(seed.clone());

        let mut queue: VecDeque<(Url, usize)> = VecDeque::from([(seed.clone(), 0)]);
        let mut fetched: HashSet<String> = HashSet::new();
        graph.add_node(seed.to_string());

        while let Some((address, depth)) = queue.pop_front() {
            if !fetched.insert(address.to_string()) {
                continue;
            }

            let page = match fetcher.fetch(&address).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %address, error = %e, "skipping unreachable page");
                    continue;
                }
            };

            graph.set_body(address.to_string(), page.text.clone());

            for link in &page.links {
                if link.url == address {
                    continue; // no self-loops
                }
                graph.add_edge(
                    address.to_string(),
                    link.url.to_string(),
                    link.text.clone(),
                    link.paragraph.clone(),
                    None,
                );
                if depth < max_depth && !fetched.contains(link.url.as_str()) {
                    queue.push_back((link.url.clone(), depth + 1));
                }
            }
        }

        graph
    }

    /// Persist the graph as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GraphStoreError> {
        let encoded = serde_json::to_string_pretty(self)?;
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Load a graph from JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphStoreError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.to_lowercase().matches(needle).count()
}
