//! Read-side projections over a `DeskState` snapshot
//!
//! Everything here is a pure function of the snapshot (and a reference
//! instant where dates matter). Missing references render with the
//! dashboard's placeholders rather than failing.

pub mod activity;
pub mod overview;
pub mod tasks;

pub use activity::{activity_page, ActivityPage};
pub use overview::{overview, AtRiskLocation, Overview};
pub use tasks::{delivery_queue, filter_tasks, status_counts, writer_queue, StatusCounts, TaskFilter};

use crate::state::DeskState;
use peach_core::{ClientId, LocationId, UserId};

pub const UNKNOWN: &str = "Unknown";
pub const UNASSIGNED: &str = "Unassigned";

pub fn client_name<'a>(state: &'a DeskState, id: &ClientId) -> &'a str {
    state.client(id).map_or(UNKNOWN, |c| c.name.as_str())
}

pub fn location_name<'a>(state: &'a DeskState, id: &LocationId) -> &'a str {
    state.location(id).map_or(UNKNOWN, |l| l.name.as_str())
}

pub fn user_name<'a>(state: &'a DeskState, id: &UserId) -> &'a str {
    state.user(id).map_or(UNKNOWN, |u| u.name.as_str())
}

/// A task's writer, or `Unassigned` when the id does not resolve
pub fn writer_name<'a>(state: &'a DeskState, id: &UserId) -> &'a str {
    state.user(id).map_or(UNASSIGNED, |u| u.name.as_str())
}
