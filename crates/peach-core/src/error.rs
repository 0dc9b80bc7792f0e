//! Error types for Peach Core
//!
//! Every condition here is local and recoverable: the caller (usually the
//! UI layer) shows it to the user and the store is left untouched.

use crate::activity::EntityKind;
use crate::workflow::{InternalStatus, WorkflowAction};
use std::fmt;

/// Result alias for store operations
pub type DeskResult<T> = Result<T, DeskError>;

/// Main desk error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeskError {
    /// Identifier does not resolve to a record
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// Workflow action attempted from a state that does not permit it
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Malformed field value on create/update
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Sign-in rejected
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
}

impl DeskError {
    /// Create not-found error for an id
    #[inline]
    pub fn not_found(kind: RecordKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Stable machine-readable code for display layers
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
        }
    }
}

/// Collections an id can be looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Client,
    Location,
    User,
    Task,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Client => "client",
            RecordKind::Location => "location",
            RecordKind::User => "user",
            RecordKind::Task => "task",
        })
    }
}

impl From<EntityKind> for RecordKind {
    fn from(value: EntityKind) -> Self {
        match value {
            EntityKind::Client => RecordKind::Client,
            EntityKind::Location => RecordKind::Location,
            EntityKind::User => RecordKind::User,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a task in status {from}")]
pub struct TransitionError {
    pub from: InternalStatus,
    pub action: WorkflowAction,
}

/// Field-level validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Blank { field: &'static str },

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("monthly recurring revenue must be a non-negative amount, got {0}")]
    InvalidMrr(f64),

    #[error("SLA hours must be a positive number of hours")]
    ZeroSlaHours,

    #[error("{kind} id '{id}' already exists")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("unknown role: '{0}'")]
    UnknownRole(String),

    #[error("unknown platform: '{0}'")]
    UnknownPlatform(String),
}

impl ValidationError {
    #[inline]
    #[must_use]
    pub fn blank(field: &'static str) -> Self {
        Self::Blank { field }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_record() {
        let err = DeskError::not_found(RecordKind::Task, "t42");
        assert_eq!(err.to_string(), "task not found: t42");
        assert!(err.is_not_found());
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn transition_error_reads_naturally() {
        let err: DeskError = TransitionError {
            from: InternalStatus::New,
            action: WorkflowAction::MarkDelivered,
        }
        .into();
        assert_eq!(err.to_string(), "cannot mark delivered a task in status New");
        assert_eq!(err.code(), "invalid_transition");
    }
}
