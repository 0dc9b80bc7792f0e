//! Peach Core - domain model for the review-content workflow
//!
//! Defines everything the desk store operates on:
//! - Entities (clients, locations, users, tasks) and their id newtypes
//! - The task workflow state machine (New → Writing → Written → Delivered)
//! - The structured activity log model
//! - Partial-update patches, validation and form-input coercion
//! - The error taxonomy surfaced to callers
//!
//! # Example
//!
//! ```rust
//! use peach_core::workflow::{transition, InternalStatus, WorkflowAction};
//!
//! let next = transition(InternalStatus::New, WorkflowAction::StartWriting).unwrap();
//! assert_eq!(next, InternalStatus::Writing);
//! assert!(transition(next, WorkflowAction::MarkDelivered).is_err());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod activity;
pub mod error;
pub mod forms;
pub mod ids;
pub mod patch;
pub mod record;
pub mod types;
pub mod validation;
pub mod workflow;

pub use activity::{ActivityCategory, ActivityEntry, ActivityKind, EntityKind};
pub use error::{AuthError, DeskError, DeskResult, RecordKind, TransitionError, ValidationError};
pub use ids::{ClientId, EntryId, LocationId, TaskId, UserId};
pub use patch::{ClientPatch, LocationPatch, UserPatch};
pub use record::Record;
pub use types::{Client, ClientStatus, ExternalStatus, Location, Platform, Priority, Role, Task, User};
pub use workflow::{InternalStatus, TransitionPolicy, WorkflowAction};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Peach Core
    pub use crate::{
        ActivityEntry, ActivityKind, Client, ClientId, ClientPatch, DeskError, DeskResult,
        InternalStatus, Location, LocationId, LocationPatch, Platform, Priority, Role, Task,
        TaskId, TransitionPolicy, User, UserId, UserPatch, WorkflowAction,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
