//! JSON snapshots of the whole desk
//!
//! A snapshot carries the five collections, the signed-in user and a
//! format version. Saving and loading are explicit caller actions.

use crate::state::DeskState;
use chrono::{DateTime, Utc};
use peach_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format
pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u64 },

    #[error("invalid snapshot record: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u64,
    pub saved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: DeskState,
}

impl Snapshot {
    #[must_use]
    pub fn capture(state: &DeskState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, rejecting any format version but the current one
    /// and any record that would fail its own add operation
    pub fn from_json(input: &str) -> Result<Self, SnapshotError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        let found = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if found != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found,
                expected: SNAPSHOT_VERSION,
            });
        }
        let mut snapshot: Self = serde_json::from_value(value)?;
        snapshot.state.normalize_and_validate()?;
        Ok(snapshot)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), tasks = self.state.tasks.len(), "saved snapshot");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), tasks = snapshot.state.tasks.len(), "loaded snapshot");
        Ok(snapshot)
    }

    #[must_use]
    pub fn into_state(self) -> DeskState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    #[test]
    fn json_carries_version_and_flat_collections() {
        let snapshot = Snapshot::capture(&DeskState::from_seed(&Seed::demo()));
        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["tasks"].is_array());
        assert!(value["globalActivity"].is_array());
        assert!(value["currentUser"].is_null());
    }

    #[test]
    fn other_versions_are_rejected() {
        let err = Snapshot::from_json(r#"{"version": 7}"#).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found: 7, expected: 1 }
        ));

        let err = Snapshot::from_json(r#"{"tasks": []}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 0, .. }));
    }

    #[test]
    fn invalid_records_are_rejected() {
        let json = Snapshot::capture(&DeskState::from_seed(&Seed::demo()))
            .to_json()
            .unwrap();

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["locations"][0]["slaHours"] = 0.into();
        let err = Snapshot::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SnapshotError::Invalid(ValidationError::ZeroSlaHours)));

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = value["clients"][0].clone();
        value["clients"].as_array_mut().unwrap().push(first);
        let err = Snapshot::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Invalid(ValidationError::DuplicateId { kind: peach_core::EntityKind::Client, .. })
        ));
    }

    #[test]
    fn garbage_is_a_serde_error() {
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(SnapshotError::Serde(_))
        ));
    }
}
