//! Paged, searchable activity feed

use crate::state::DeskState;
use peach_core::ActivityEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityPage<'a> {
    pub entries: Vec<&'a ActivityEntry>,
    /// Entries matching the search across all pages
    pub total: usize,
    pub has_more: bool,
}

/// One page of the global feed, newest first.
///
/// `search` matches the action text or the actor's name, case-insensitively;
/// a blank search matches everything. Pages are zero-based.
pub fn activity_page<'a>(
    state: &'a DeskState,
    search: &str,
    page: usize,
    page_size: usize,
) -> ActivityPage<'a> {
    let query = search.trim().to_lowercase();
    let mut matching: Vec<&ActivityEntry> = state
        .global_activity
        .iter()
        .filter(|entry| {
            query.is_empty()
                || entry.action().to_lowercase().contains(&query)
                || entry
                    .user_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&query))
        })
        .collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = matching.len();
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    ActivityPage {
        entries: matching[start..end].to_vec(),
        total,
        has_more: end < total,
    }
}
