//! Core entity types
//!
//! Serialized field names follow the dashboard's JSON shape (camelCase,
//! `airtableStatus` / `airtableLocationId` for the external-system fields),
//! so snapshots stay readable by the web client.

use crate::activity::ActivityEntry;
use crate::error::ValidationError;
use crate::ids::{ClientId, LocationId, TaskId, UserId};
use crate::workflow::InternalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Persona a user signs in as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Writer,
    Provider,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Writer, Role::Provider];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Writer => "writer",
            Role::Provider => "provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "writer" => Ok(Role::Writer),
            "provider" => Ok(Role::Provider),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// Commercial status of a client account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Paused,
    Cancelled,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] =
        [ClientStatus::Active, ClientStatus::Paused, ClientStatus::Cancelled];
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Review platforms a location can be reviewed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Google,
    Trustpilot,
    Facebook,
    Yelp,
    TripAdvisor,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Google,
        Platform::Trustpilot,
        Platform::Facebook,
        Platform::Yelp,
        Platform::TripAdvisor,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Google => "Google",
            Platform::Trustpilot => "Trustpilot",
            Platform::Facebook => "Facebook",
            Platform::Yelp => "Yelp",
            Platform::TripAdvisor => "TripAdvisor",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match against the platform names.
impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPlatform(s.to_string()))
    }
}

/// Status label mirrored from the external system of record.
///
/// Kept loosely in sync with [`InternalStatus`] by the workflow actions;
/// never validated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Written,
    Delivered,
    Published,
}

impl ExternalStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExternalStatus::Scheduled => "Scheduled",
            ExternalStatus::InProgress => "In Progress",
            ExternalStatus::Written => "Written",
            ExternalStatus::Delivered => "Delivered",
            ExternalStatus::Published => "Published",
        }
    }
}

impl fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Clients a provider delivers for; ignored for other roles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_ids: Vec<ClientId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_location_ids: Vec<LocationId>,
}

impl User {
    #[must_use]
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            avatar: None,
            client_ids: Vec::new(),
            assigned_location_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_client_ids(mut self, client_ids: Vec<ClientId>) -> Self {
        self.client_ids = client_ids;
        self
    }

    #[must_use]
    pub fn with_location_ids(mut self, location_ids: Vec<LocationId>) -> Self {
        self.assigned_location_ids = location_ids;
        self
    }

    /// Whether this provider delivers for `client_id`
    #[must_use]
    pub fn serves_client(&self, client_id: &ClientId) -> bool {
        self.role == Role::Provider && self.client_ids.contains(client_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub status: ClientStatus,
    pub package_name: String,
    /// Monthly recurring revenue, non-negative
    pub mrr: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    #[must_use]
    pub fn new(id: impl Into<ClientId>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ClientStatus::Active,
            package_name: String::new(),
            mrr: 0.0,
            notes: String::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_package(mut self, package_name: impl Into<String>, mrr: f64) -> Self {
        self.package_name = package_name.into();
        self.mrr = mrr;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub client_id: ClientId,
    pub name: String,
    #[serde(default)]
    pub city: String,
    pub active: bool,
    pub platforms: Vec<Platform>,
    pub sla_hours: u32,
    #[serde(rename = "airtableLocationId", default)]
    pub external_id: String,
}

impl Location {
    /// SLA applied when none is given
    pub const DEFAULT_SLA_HOURS: u32 = 48;

    #[must_use]
    pub fn new(
        id: impl Into<LocationId>,
        client_id: impl Into<ClientId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            name: name.into(),
            city: String::new(),
            active: true,
            platforms: Vec::new(),
            sla_hours: Self::DEFAULT_SLA_HOURS,
            external_id: String::new(),
        }
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    #[must_use]
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    #[must_use]
    pub fn with_sla_hours(mut self, sla_hours: u32) -> Self {
        self.sla_hours = sla_hours;
        self
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = external_id.into();
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// The unit of work: one review to write for one location on one platform.
///
/// `client_id` is stored alongside `location_id` rather than derived from the
/// location, so the two may disagree if the location is later moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub client_id: ClientId,
    pub location_id: LocationId,
    pub platform: Platform,
    pub due_at: DateTime<Utc>,
    pub priority: Priority,
    #[serde(rename = "airtableStatus")]
    pub external_status: ExternalStatus,
    pub internal_status: InternalStatus,
    pub writer_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<UserId>,
    pub content_brief: String,
    #[serde(default)]
    pub content_draft: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub written_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
}

impl Task {
    /// Create a task in `New` / `Scheduled` with an empty draft
    #[must_use]
    pub fn new(
        id: impl Into<TaskId>,
        location: &Location,
        platform: Platform,
        writer_id: impl Into<UserId>,
        due_at: DateTime<Utc>,
        content_brief: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            client_id: location.client_id.clone(),
            location_id: location.id.clone(),
            platform,
            due_at,
            priority: Priority::Medium,
            external_status: ExternalStatus::Scheduled,
            internal_status: InternalStatus::New,
            writer_id: writer_id.into(),
            provider_id: None,
            content_brief: content_brief.into(),
            content_draft: String::new(),
            tone: None,
            word_count: None,
            written_at: None,
            delivered_at: None,
            activity: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider_id: impl Into<UserId>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    #[must_use]
    pub fn with_tone(mut self, tone: impl Into<String>, word_count: Option<u32>) -> Self {
        self.tone = Some(tone.into());
        self.word_count = word_count;
        self
    }

    #[must_use]
    pub fn with_draft(mut self, draft: impl Into<String>) -> Self {
        self.content_draft = draft.into();
        self
    }

    /// Due in the past and not yet delivered
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_at < now && self.internal_status != InternalStatus::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parsing_is_case_sensitive() {
        assert_eq!("Google".parse::<Platform>().unwrap(), Platform::Google);
        assert_eq!("TripAdvisor".parse::<Platform>().unwrap(), Platform::TripAdvisor);
        assert!("google".parse::<Platform>().is_err());
        assert!("MySpace".parse::<Platform>().is_err());
    }

    #[test]
    fn role_parsing_ignores_case() {
        assert_eq!("Writer".parse::<Role>().unwrap(), Role::Writer);
        assert!(matches!(
            "editor".parse::<Role>(),
            Err(ValidationError::UnknownRole(_))
        ));
    }

    #[test]
    fn external_status_serializes_with_space() {
        let json = serde_json::to_string(&ExternalStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
    }

    #[test]
    fn task_serializes_dashboard_field_names() {
        let location = Location::new("l1", "c1", "Downtown");
        let task = Task::new("t1", &location, Platform::Yelp, "w1", Utc::now(), "brief");
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["airtableStatus"], "Scheduled");
        assert_eq!(value["internalStatus"], "New");
        assert_eq!(value["writerId"], "w1");
        assert_eq!(value["clientId"], "c1");
        assert!(value.get("providerId").is_none());
    }

    #[test]
    fn provider_serves_only_linked_clients() {
        let provider = User::new("p1", "Dana", "dana@example.com", Role::Provider)
            .with_client_ids(vec![ClientId::new("c1")]);
        assert!(provider.serves_client(&ClientId::new("c1")));
        assert!(!provider.serves_client(&ClientId::new("c2")));

        let writer = User::new("w1", "Alice", "alice@example.com", Role::Writer)
            .with_client_ids(vec![ClientId::new("c1")]);
        assert!(!writer.serves_client(&ClientId::new("c1")));
    }
}
