//! Desk configuration
//!
//! Loaded from TOML, then overridden by `PEACH_DESK_*` environment
//! variables. Every field has a default, so an empty file is valid.

use crate::auth::CredentialTable;
use peach_core::{Location, TransitionPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PEACH_DESK_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Gate for workflow actions
    pub transition_policy: TransitionPolicy,
    /// SLA used when form input is unusable
    pub default_sla_hours: u32,
    /// Activity feed page size
    pub activity_page_size: usize,
    /// Pending tasks at which a location counts as at risk
    pub at_risk_threshold: usize,
    /// Snapshot file used by the CLI
    pub snapshot_path: Option<PathBuf>,
    pub credentials: CredentialTable,
}

impl DeskConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_credentials(mut self, credentials: CredentialTable) -> Self {
        self.credentials = credentials;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Coerce an SLA form field, falling back to `default_sla_hours`
    #[must_use]
    pub fn sla_hours_from_form(&self, input: &str) -> u32 {
        peach_core::forms::parse_sla_hours(input, self.default_sla_hours)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the desk
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_sla_hours == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_sla_hours".to_string(),
                value: self.default_sla_hours.to_string(),
            });
        }
        if self.activity_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "activity_page_size".to_string(),
                value: self.activity_page_size.to_string(),
            });
        }
        Ok(())
    }

    /// Read a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded desk config");
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(std::env::vars())
    }

    /// Apply `PEACH_DESK_*` overrides from an explicit variable list
    pub fn with_overrides<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();
            let invalid = || ConfigError::InvalidValue {
                key: key.as_ref().to_string(),
                value: value.to_string(),
            };
            match name {
                "TRANSITION_POLICY" => {
                    self.transition_policy = match value.to_ascii_lowercase().as_str() {
                        "strict" => TransitionPolicy::Strict,
                        "lenient" => TransitionPolicy::Lenient,
                        _ => return Err(invalid()),
                    };
                }
                "DEFAULT_SLA_HOURS" => {
                    self.default_sla_hours = value
                        .parse()
                        .ok()
                        .filter(|hours| *hours > 0)
                        .ok_or_else(invalid)?;
                }
                "ACTIVITY_PAGE_SIZE" => {
                    self.activity_page_size = value
                        .parse()
                        .ok()
                        .filter(|size| *size > 0)
                        .ok_or_else(invalid)?;
                }
                "AT_RISK_THRESHOLD" => {
                    self.at_risk_threshold = value.parse().map_err(|_| invalid())?;
                }
                "SNAPSHOT_PATH" => {
                    self.snapshot_path = if value.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    };
                }
                other => tracing::warn!(key = other, "ignoring unknown config override"),
            }
        }
        self.validate()?;
        Ok(self)
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            transition_policy: TransitionPolicy::Strict,
            default_sla_hours: Location::DEFAULT_SLA_HOURS,
            activity_page_size: 20,
            at_risk_threshold: 3,
            snapshot_path: None,
            credentials: CredentialTable::demo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SessionManager;
    use crate::auth::Credential;
    use peach_core::Role;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = DeskConfig::from_toml_str("").unwrap();
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.default_sla_hours, 48);
        assert_eq!(config.credentials.len(), 3);
    }

    #[test]
    fn toml_overrides_fields() {
        let config = DeskConfig::from_toml_str(
            r#"
            transition_policy = "lenient"
            activity_page_size = 50
            snapshot_path = "/tmp/desk.json"

            [[credentials]]
            email = "ops@example.com"
            password = "hunter2"
            role = "admin"
            "#,
        )
        .unwrap();
        assert_eq!(config.transition_policy, TransitionPolicy::Lenient);
        assert_eq!(config.activity_page_size, 50);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/desk.json")));
        assert_eq!(
            config.credentials,
            CredentialTable::new(vec![Credential::new("ops@example.com", "hunter2", Role::Admin)])
        );
    }

    #[test]
    fn env_overrides_apply_and_validate() {
        let config = DeskConfig::new()
            .with_overrides([
                ("PEACH_DESK_TRANSITION_POLICY", "Lenient"),
                ("PEACH_DESK_DEFAULT_SLA_HOURS", "24"),
                ("UNRELATED", "x"),
            ])
            .unwrap();
        assert_eq!(config.transition_policy, TransitionPolicy::Lenient);
        assert_eq!(config.default_sla_hours, 24);

        let err = DeskConfig::new()
            .with_overrides([("PEACH_DESK_DEFAULT_SLA_HOURS", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn sla_form_input_uses_configured_default() {
        let config = DeskConfig::new()
            .with_overrides([("PEACH_DESK_DEFAULT_SLA_HOURS", "36")])
            .unwrap();
        assert_eq!(config.sla_hours_from_form("72"), 72);
        assert_eq!(config.sla_hours_from_form("soon"), 36);
        assert_eq!(config.sla_hours_from_form("0"), 36);
    }

    #[test]
    fn zero_sizes_in_toml_are_rejected() {
        let err = DeskConfig::from_toml_str("default_sla_hours = 0").unwrap_err();
        assert!(
            matches!(&err, ConfigError::InvalidValue { key, value } if key == "default_sla_hours" && value == "0")
        );

        let err = DeskConfig::from_toml_str("activity_page_size = 0").unwrap_err();
        assert!(
            matches!(&err, ConfigError::InvalidValue { key, .. } if key == "activity_page_size")
        );
    }

    #[test]
    fn configured_emails_sign_in_regardless_of_case() {
        let config = DeskConfig::from_toml_str(
            r#"
            [[credentials]]
            email = "Ops@Example.com"
            password = "pw"
            role = "admin"
            "#,
        )
        .unwrap();
        assert_eq!(config.credentials.authenticate("Ops@Example.com", "pw"), Ok(Role::Admin));

        let desk = crate::DeskHandle::with_config(config);
        let user = desk.login("Ops@Example.com", "pw").unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            DeskConfig::from_toml_str("transition_policy = 7"),
            Err(ConfigError::Parse(_))
        ));
    }
}
