//! Shared behavior of directory entities (clients, locations, users)
//!
//! The store's add/update/delete operations are written once against this
//! trait instead of three times against concrete types.

use crate::activity::EntityKind;
use crate::error::ValidationError;
use crate::ids::{ClientId, LocationId, UserId};
use crate::patch::{ClientPatch, LocationPatch, UserPatch};
use crate::types::{Client, Location, User};
use crate::validation;
use std::fmt;

pub trait Record: Clone + fmt::Debug {
    const KIND: EntityKind;

    type Id: Clone + PartialEq + fmt::Display + AsRef<str>;
    type Patch;

    fn id(&self) -> &Self::Id;

    /// Label used in activity messages
    fn display_name(&self) -> &str;

    /// Shallow merge: every field present in the patch overwrites ours
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Canonicalize fields that are filtered rather than rejected
    fn normalize(&mut self) {}

    fn validate(&self) -> Result<(), ValidationError>;
}

impl Record for Client {
    const KIND: EntityKind = EntityKind::Client;
    type Id = ClientId;
    type Patch = ClientPatch;

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn apply_patch(&mut self, patch: &ClientPatch) {
        patch.apply(self);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_client(self)
    }
}

impl Record for Location {
    const KIND: EntityKind = EntityKind::Location;
    type Id = LocationId;
    type Patch = LocationPatch;

    fn id(&self) -> &LocationId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn apply_patch(&mut self, patch: &LocationPatch) {
        patch.apply(self);
    }

    fn normalize(&mut self) {
        validation::dedup_platforms(&mut self.platforms);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_location(self)
    }
}

impl Record for User {
    const KIND: EntityKind = EntityKind::User;
    type Id = UserId;
    type Patch = UserPatch;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn apply_patch(&mut self, patch: &UserPatch) {
        patch.apply(self);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_user(self)
    }
}
