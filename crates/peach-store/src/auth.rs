//! Demo credential table
//!
//! Sign-in is a lookup, not a security boundary: accounts map an email and
//! password to the role the session assumes.

use peach_core::{AuthError, Role};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(deserialize_with = "deserialize_email")]
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Credential {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: normalize_email(&email.into()),
            password: password.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialTable(Vec<Credential>);

impl CredentialTable {
    #[must_use]
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self(credentials)
    }

    /// One account per role, password `password`
    #[must_use]
    pub fn demo() -> Self {
        Self(vec![
            Credential::new("admin@peachreviews.com", "password", Role::Admin),
            Credential::new("writer@peachreviews.com", "password", Role::Writer),
            Credential::new("provider@peachreviews.com", "password", Role::Provider),
        ])
    }

    /// Resolve the role for an email/password pair.
    ///
    /// The email is trimmed and lower-cased; the password must match exactly.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Role, AuthError> {
        let email = normalize_email(email);
        self.0
            .iter()
            .find(|c| c.email == email && c.password == password)
            .map(|c| c.role)
            .ok_or(AuthError::InvalidCredentials)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CredentialTable {
    fn default() -> Self {
        Self::demo()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn deserialize_email<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|email| normalize_email(&email))
}
