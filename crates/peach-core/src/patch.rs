//! Partial updates for directory entities
//!
//! A patch holds `Some` for every field the caller wants to overwrite.
//! Ids and creation timestamps are not patchable.

use crate::ids::{ClientId, LocationId};
use crate::types::{Client, ClientStatus, Location, Platform, Role, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    pub status: Option<ClientStatus>,
    pub package_name: Option<String>,
    pub mrr: Option<f64>,
    pub notes: Option<String>,
}

impl ClientPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_mrr(mut self, mrr: f64) -> Self {
        self.mrr = Some(mrr);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn apply(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name.clone_from(name);
        }
        if let Some(status) = self.status {
            client.status = status;
        }
        if let Some(package_name) = &self.package_name {
            client.package_name.clone_from(package_name);
        }
        if let Some(mrr) = self.mrr {
            client.mrr = mrr;
        }
        if let Some(notes) = &self.notes {
            client.notes.clone_from(notes);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocationPatch {
    pub client_id: Option<ClientId>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub active: Option<bool>,
    pub platforms: Option<Vec<Platform>>,
    pub sla_hours: Option<u32>,
    #[serde(rename = "airtableLocationId")]
    pub external_id: Option<String>,
}

impl LocationPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    #[must_use]
    pub fn with_sla_hours(mut self, sla_hours: u32) -> Self {
        self.sla_hours = Some(sla_hours);
        self
    }

    pub fn apply(&self, location: &mut Location) {
        if let Some(client_id) = &self.client_id {
            location.client_id.clone_from(client_id);
        }
        if let Some(name) = &self.name {
            location.name.clone_from(name);
        }
        if let Some(city) = &self.city {
            location.city.clone_from(city);
        }
        if let Some(active) = self.active {
            location.active = active;
        }
        if let Some(platforms) = &self.platforms {
            location.platforms.clone_from(platforms);
        }
        if let Some(sla_hours) = self.sla_hours {
            location.sla_hours = sla_hours;
        }
        if let Some(external_id) = &self.external_id {
            location.external_id.clone_from(external_id);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub avatar: Option<String>,
    pub client_ids: Option<Vec<ClientId>>,
    pub assigned_location_ids: Option<Vec<LocationId>>,
}

impl UserPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn with_client_ids(mut self, client_ids: Vec<ClientId>) -> Self {
        self.client_ids = Some(client_ids);
        self
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(client_ids) = &self.client_ids {
            user.client_ids.clone_from(client_ids);
        }
        if let Some(location_ids) = &self.assigned_location_ids {
            user.assigned_location_ids.clone_from(location_ids);
        }
    }
}
