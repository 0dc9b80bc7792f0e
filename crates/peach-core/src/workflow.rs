//! Task workflow state machine
//!
//! Internal status only moves forward: New → Writing → Written → Delivered.
//! Each step is driven by exactly one [`WorkflowAction`]; under the strict
//! policy any other (state, action) pair is rejected with a
//! [`TransitionError`].

use crate::error::TransitionError;
use crate::types::ExternalStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoritative workflow stage of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InternalStatus {
    New,
    Writing,
    Written,
    Delivered,
}

impl InternalStatus {
    pub const ALL: [InternalStatus; 4] = [
        InternalStatus::New,
        InternalStatus::Writing,
        InternalStatus::Written,
        InternalStatus::Delivered,
    ];

    /// Position in the forward-only ordering
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            InternalStatus::New => 0,
            InternalStatus::Writing => 1,
            InternalStatus::Written => 2,
            InternalStatus::Delivered => 3,
        }
    }

    /// Not yet delivered
    #[must_use]
    pub fn is_pending(self) -> bool {
        self != InternalStatus::Delivered
    }
}

impl fmt::Display for InternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowAction {
    StartWriting,
    MarkWritten,
    MarkDelivered,
}

impl WorkflowAction {
    pub const ALL: [WorkflowAction; 3] = [
        WorkflowAction::StartWriting,
        WorkflowAction::MarkWritten,
        WorkflowAction::MarkDelivered,
    ];

    /// State the action moves a task into
    #[must_use]
    pub fn target(self) -> InternalStatus {
        match self {
            WorkflowAction::StartWriting => InternalStatus::Writing,
            WorkflowAction::MarkWritten => InternalStatus::Written,
            WorkflowAction::MarkDelivered => InternalStatus::Delivered,
        }
    }

    /// State the action must be applied from under the strict policy
    #[must_use]
    pub fn source(self) -> InternalStatus {
        match self {
            WorkflowAction::StartWriting => InternalStatus::New,
            WorkflowAction::MarkWritten => InternalStatus::Writing,
            WorkflowAction::MarkDelivered => InternalStatus::Written,
        }
    }

    /// External label written alongside the transition
    #[must_use]
    pub fn external_status(self) -> ExternalStatus {
        match self {
            WorkflowAction::StartWriting => ExternalStatus::InProgress,
            WorkflowAction::MarkWritten => ExternalStatus::Written,
            WorkflowAction::MarkDelivered => ExternalStatus::Delivered,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowAction::StartWriting => "start writing",
            WorkflowAction::MarkWritten => "mark written",
            WorkflowAction::MarkDelivered => "mark delivered",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates a workflow step and returns the resulting state.
pub fn transition(
    current: InternalStatus,
    action: WorkflowAction,
) -> Result<InternalStatus, TransitionError> {
    if current == action.source() {
        Ok(action.target())
    } else {
        Err(TransitionError {
            from: current,
            action,
        })
    }
}

pub fn allowed_actions(current: InternalStatus) -> Vec<WorkflowAction> {
    WorkflowAction::ALL
        .into_iter()
        .filter(|action| action.source() == current)
        .collect()
}

/// How workflow actions are gated
///
/// `Lenient` applies every action from every state, restamping
/// `writtenAt`/`deliveredAt` each time. It exists to replay data captured
/// from the unguarded dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    #[default]
    Strict,
    Lenient,
}

impl TransitionPolicy {
    pub fn apply(
        self,
        current: InternalStatus,
        action: WorkflowAction,
    ) -> Result<InternalStatus, TransitionError> {
        match self {
            TransitionPolicy::Strict => transition(current, action),
            TransitionPolicy::Lenient => Ok(action.target()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_walks_every_state() {
        let mut status = InternalStatus::New;
        for action in WorkflowAction::ALL {
            status = transition(status, action).unwrap();
        }
        assert_eq!(status, InternalStatus::Delivered);
    }

    #[test]
    fn delivered_is_terminal() {
        assert!(allowed_actions(InternalStatus::Delivered).is_empty());
    }

    #[test]
    fn skipping_a_stage_is_rejected() {
        let err = transition(InternalStatus::New, WorkflowAction::MarkDelivered).unwrap_err();
        assert_eq!(err.from, InternalStatus::New);
        assert_eq!(err.action, WorkflowAction::MarkDelivered);
    }

    #[test]
    fn lenient_policy_applies_any_action() {
        let next = TransitionPolicy::Lenient
            .apply(InternalStatus::Delivered, WorkflowAction::StartWriting)
            .unwrap();
        assert_eq!(next, InternalStatus::Writing);
    }

    #[test]
    fn external_labels_follow_actions() {
        assert_eq!(
            WorkflowAction::StartWriting.external_status(),
            ExternalStatus::InProgress
        );
        assert_eq!(
            WorkflowAction::MarkDelivered.external_status(),
            ExternalStatus::Delivered
        );
    }
}
