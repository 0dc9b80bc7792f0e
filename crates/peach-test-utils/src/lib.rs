//! Testing utilities for the Peach Desk workspace
//!
//! Fixtures shared by the integration tests: handles over the demo seed,
//! a fixed reference instant, and ready-made records.

#![allow(missing_docs)]

use chrono::{DateTime, TimeZone, Utc};
use peach_core::{Client, Location, Platform, Role, Task, TaskId, TransitionPolicy, User};
use peach_store::{DeskConfig, DeskHandle, DeskState, SessionManager, Seed};

/// Reference instant for date-sensitive fixtures
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn demo_seed() -> Seed {
    Seed::demo_at(fixed_now())
}

/// Demo desk, strict policy, nobody signed in
pub fn seeded_handle() -> DeskHandle {
    DeskHandle::with_seed(&demo_seed(), DeskConfig::default())
}

pub fn lenient_handle() -> DeskHandle {
    DeskHandle::with_seed(
        &demo_seed(),
        DeskConfig::default().with_transition_policy(TransitionPolicy::Lenient),
    )
}

pub fn empty_handle() -> DeskHandle {
    DeskHandle::with_seed(&Seed::empty(), DeskConfig::default())
}

/// Demo desk with the first user of `role` signed in
pub fn handle_logged_in_as(role: Role) -> DeskHandle {
    let desk = seeded_handle();
    desk.login_role(role).unwrap();
    desk
}

pub fn task(state: &DeskState, id: &str) -> Task {
    state.task(&TaskId::new(id)).cloned().unwrap()
}

pub fn sample_client(id: &str) -> Client {
    Client::new(id, format!("Client {id}"), fixed_now()).with_package("Starter", 500.0)
}

pub fn sample_location(id: &str, client_id: &str) -> Location {
    Location::new(id, client_id, format!("Location {id}"))
        .with_city("Tacoma")
        .with_platforms(vec![Platform::Google])
}

pub fn sample_user(id: &str, role: Role) -> User {
    User::new(id, format!("User {id}"), format!("{id}@example.com"), role)
}
