//! Headline stats over a filtered post set.

use std::collections::HashSet;

use serde::Serialize;

use pulselens_core::Post;

/// Totals shown above the data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_engagements: u64,
    /// Count of distinct non-empty handles.
    pub unique_accounts: usize,
}

impl Stats {
    #[must_use]
    pub fn compute(posts: &[Post]) -> Self {
        let handles: HashSet<&str> = posts
            .iter()
            .map(|p| p.handle.as_str())
            .filter(|h| !h.is_empty())
            .collect();

        Self {
            total_engagements: posts.iter().map(|p| p.engagements).sum(),
            unique_accounts: handles.len(),
        }
    }
}
