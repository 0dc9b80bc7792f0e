//! Task lists: admin table, writer queue, provider delivery queue

use super::{client_name, location_name, writer_name};
use crate::state::DeskState;
use peach_core::{ClientId, InternalStatus, Platform, Priority, Task, UserId};
use serde::Serialize;

/// Conjunction of optional criteria; an empty filter matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<InternalStatus>,
    pub priority: Option<Priority>,
    pub client_id: Option<ClientId>,
    pub writer_id: Option<UserId>,
    pub platform: Option<Platform>,
    /// Case-insensitive substring over client, location and writer names,
    /// the platform and the draft
    pub search: Option<String>,
}

impl TaskFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(mut self, status: InternalStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_client(mut self, client_id: impl Into<ClientId>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub fn with_writer(mut self, writer_id: impl Into<UserId>) -> Self {
        self.writer_id = Some(writer_id.into());
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, state: &DeskState, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.internal_status)
            || self.priority.is_some_and(|p| p != task.priority)
            || self.platform.is_some_and(|p| p != task.platform)
            || self.client_id.as_ref().is_some_and(|c| *c != task.client_id)
            || self.writer_id.as_ref().is_some_and(|w| *w != task.writer_id)
        {
            return false;
        }

        let query = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };
        [
            client_name(state, &task.client_id),
            location_name(state, &task.location_id),
            writer_name(state, &task.writer_id),
            task.platform.as_str(),
            task.content_draft.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

pub fn filter_tasks<'a>(state: &'a DeskState, filter: &TaskFilter) -> Vec<&'a Task> {
    let tasks: Vec<&Task> = state
        .tasks
        .iter()
        .filter(|t| filter.matches(state, t))
        .collect();
    tracing::debug!(matched = tasks.len(), total = state.tasks.len(), "filtered tasks");
    tasks
}

/// Every task assigned to `writer_id`, in collection order
pub fn writer_queue<'a>(state: &'a DeskState, writer_id: &UserId) -> Vec<&'a Task> {
    state.tasks.iter().filter(|t| &t.writer_id == writer_id).collect()
}

/// Written tasks waiting for a provider to deliver them
pub fn delivery_queue(state: &DeskState) -> Vec<&Task> {
    state
        .tasks
        .iter()
        .filter(|t| t.internal_status == InternalStatus::Written)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub all: usize,
    pub new: usize,
    pub writing: usize,
    pub written: usize,
    pub delivered: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn get(&self, status: InternalStatus) -> usize {
        match status {
            InternalStatus::New => self.new,
            InternalStatus::Writing => self.writing,
            InternalStatus::Written => self.written,
            InternalStatus::Delivered => self.delivered,
        }
    }
}

pub fn status_counts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> StatusCounts {
    tasks
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, task| {
            counts.all += 1;
            match task.internal_status {
                InternalStatus::New => counts.new += 1,
                InternalStatus::Writing => counts.writing += 1,
                InternalStatus::Written => counts.written += 1,
                InternalStatus::Delivered => counts.delivered += 1,
            }
            counts
        })
}
