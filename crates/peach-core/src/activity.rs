//! Activity log model
//!
//! Every state-changing operation produces exactly one [`ActivityEntry`].
//! The entry's [`ActivityKind`] carries structured data; the human-readable
//! action line is derived from it on display.

use crate::ids::{EntryId, TaskId, UserId};
use crate::types::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory entities with add/update/delete operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Client,
    Location,
    User,
}

impl EntityKind {
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Location => "location",
            EntityKind::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// What happened, with the data needed to describe it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActivityKind {
    TaskStarted {
        task_id: TaskId,
    },
    DraftSaved {
        task_id: TaskId,
    },
    TaskWritten {
        task_id: TaskId,
    },
    TaskDelivered {
        task_id: TaskId,
    },
    TaskReassigned {
        task_id: TaskId,
        writer_id: UserId,
        /// Writer's name at the time, if the id resolved
        writer_name: Option<String>,
    },
    EntityAdded {
        entity: EntityKind,
        id: String,
        name: String,
    },
    EntityUpdated {
        entity: EntityKind,
        id: String,
    },
    EntityDeleted {
        entity: EntityKind,
        id: String,
        name: Option<String>,
    },
}

impl ActivityKind {
    /// Task this entry belongs to, if any
    #[must_use]
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            ActivityKind::TaskStarted { task_id }
            | ActivityKind::DraftSaved { task_id }
            | ActivityKind::TaskWritten { task_id }
            | ActivityKind::TaskDelivered { task_id }
            | ActivityKind::TaskReassigned { task_id, .. } => Some(task_id),
            ActivityKind::EntityAdded { .. }
            | ActivityKind::EntityUpdated { .. }
            | ActivityKind::EntityDeleted { .. } => None,
        }
    }

    #[must_use]
    pub fn category(&self) -> ActivityCategory {
        match self {
            ActivityKind::TaskStarted { .. } => ActivityCategory::Writing,
            ActivityKind::DraftSaved { .. } | ActivityKind::TaskWritten { .. } => {
                ActivityCategory::Written
            }
            ActivityKind::TaskDelivered { .. } => ActivityCategory::Delivered,
            ActivityKind::TaskReassigned { .. } => ActivityCategory::Reassigned,
            ActivityKind::EntityAdded { .. } => ActivityCategory::Added,
            ActivityKind::EntityUpdated { .. } => ActivityCategory::Updated,
            ActivityKind::EntityDeleted { .. } => ActivityCategory::Deleted,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::TaskStarted { task_id } => write!(f, "Started writing task {task_id}"),
            ActivityKind::DraftSaved { task_id } => write!(f, "Saved draft for task {task_id}"),
            ActivityKind::TaskWritten { task_id } => write!(f, "Marked task {task_id} as written"),
            ActivityKind::TaskDelivered { task_id } => {
                write!(f, "Marked task {task_id} as delivered")
            }
            ActivityKind::TaskReassigned {
                task_id,
                writer_id,
                writer_name,
            } => {
                let writer = writer_name.as_deref().unwrap_or(writer_id.as_str());
                write!(f, "Reassigned task {task_id} to {writer}")
            }
            ActivityKind::EntityAdded { entity, name, .. } => write!(f, "Added {entity} \"{name}\""),
            ActivityKind::EntityUpdated { entity, id } => write!(f, "Updated {entity} {id}"),
            ActivityKind::EntityDeleted { entity, id, name } => {
                let label = name.as_deref().unwrap_or(id.as_str());
                write!(f, "Deleted {entity} \"{label}\"")
            }
        }
    }
}

/// Coarse grouping used to color-code feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityCategory {
    Writing,
    Written,
    Delivered,
    Reassigned,
    Added,
    Updated,
    Deleted,
}

/// Immutable record of one state-changing action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    /// Acting user, absent when nobody was signed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl ActivityEntry {
    /// Record `kind` as performed now by `actor`
    #[must_use]
    pub fn new(kind: ActivityKind, actor: Option<&User>) -> Self {
        Self::at(kind, actor, Utc::now())
    }

    #[must_use]
    pub fn at(kind: ActivityKind, actor: Option<&User>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::new(),
            timestamp,
            kind,
            user_id: actor.map(|u| u.id.clone()),
            user_name: actor.map(|u| u.name.clone()),
        }
    }

    /// Human-readable action line
    #[must_use]
    pub fn action(&self) -> String {
        self.kind.to_string()
    }
}
