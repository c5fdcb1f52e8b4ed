//! Terminal states and the final search report.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Why a search stopped. Terminal states are mutually exclusive and final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A fetched page satisfied the goal condition
    GoalFound,

    /// The frontier drained before the budget was spent
    FrontierEmpty,

    /// The page budget was exhausted
    PageLimitReached,

    /// The wall-clock budget was exhausted
    TimeLimitReached,
}

impl Termination {
    /// Short human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Termination::GoalFound => "goal found",
            Termination::FrontierEmpty => "frontier empty",
            Termination::PageLimitReached => "page limit reached",
            Termination::TimeLimitReached => "time limit reached",
        }
    }
}

/// Outcome of a finished search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Terminal state the controller reached
    pub termination: Termination,

    /// Address whose page satisfied the goal, when one was found
    pub goal: Option<Url>,

    /// Path from the seed to the goal, when one was found
    pub path: Option<Vec<Url>>,

    /// Number of pages charged against the page budget
    pub pages_visited: usize,

    /// Total wall-clock time of the search
    pub elapsed: Duration,
}

impl SearchReport {
    /// True iff the goal was found.
    pub fn found(&self) -> bool {
        self.termination == Termination::GoalFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found() {
        let report = SearchReport {
            termination: Termination::FrontierEmpty,
            goal: None,
            path: None,
            pages_visited: 4,
            elapsed: Duration::from_millis(10),
        };
        assert!(!report.found());
        assert_eq!(report.termination.label(), "frontier empty");
    }
}
