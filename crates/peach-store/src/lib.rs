//! Peach Store - the review desk's single source of truth
//!
//! `DeskHandle` owns the clients, locations, users, tasks, the global
//! activity feed and the signed-in user. Readers take immutable snapshots;
//! every mutation is applied to a copy and swapped in whole, or not at all.
//!
//! ```rust
//! use peach_store::prelude::*;
//!
//! let desk = DeskHandle::new();
//! desk.login("writer@peachreviews.com", "password").unwrap();
//! let entry = desk.start_writing(&TaskId::new("t1")).unwrap();
//! assert_eq!(entry.action(), "Started writing task t1");
//! assert_eq!(desk.snapshot().global_activity[0], entry);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod api;
pub mod auth;
pub mod config;
pub mod handle;
pub mod seed;
pub mod snapshot;
pub mod state;
pub mod test_harness;
pub mod views;

pub use api::*;
pub use auth::{Credential, CredentialTable};
pub use config::{ConfigError, DeskConfig};
pub use handle::DeskHandle;
pub use seed::Seed;
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use state::{Collection, DeskState};

/// Re-export test harness for external use
pub use test_harness::{run_simulator, SimulatorConfig, TestHarness};

pub mod prelude {
    //! Handle, operation traits and the core types they take
    pub use crate::api::*;
    pub use crate::{DeskConfig, DeskHandle, DeskState, Seed, Snapshot};
    pub use peach_core::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
