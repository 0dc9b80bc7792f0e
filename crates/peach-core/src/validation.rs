//! Field validation for directory entities
//!
//! Checks run on the fully merged entity, before it replaces anything in
//! the store.

use crate::error::ValidationError;
use crate::types::{Client, Location, Platform, User};

pub fn validate_client(client: &Client) -> Result<(), ValidationError> {
    require("client id", client.id.as_str())?;
    require("client name", &client.name)?;
    if !client.mrr.is_finite() || client.mrr < 0.0 {
        return Err(ValidationError::InvalidMrr(client.mrr));
    }
    Ok(())
}

pub fn validate_location(location: &Location) -> Result<(), ValidationError> {
    require("location id", location.id.as_str())?;
    require("location name", &location.name)?;
    require("client", location.client_id.as_str())?;
    if location.sla_hours == 0 {
        return Err(ValidationError::ZeroSlaHours);
    }
    Ok(())
}

pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    require("user id", user.id.as_str())?;
    require("user name", &user.name)?;
    require("email", &user.email)?;
    if !looks_like_email(&user.email) {
        return Err(ValidationError::InvalidEmail(user.email.clone()));
    }
    Ok(())
}

/// Drop repeated platforms, keeping first occurrences in order
pub fn dedup_platforms(platforms: &mut Vec<Platform>) {
    let mut seen = Vec::with_capacity(platforms.len());
    platforms.retain(|p| {
        if seen.contains(p) {
            false
        } else {
            seen.push(*p);
            true
        }
    });
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::blank(field))
    } else {
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::Utc;

    #[test]
    fn client_requires_name_and_sane_mrr() {
        let ok = Client::new("c1", "Harbor", Utc::now()).with_package("Growth", 100.0);
        assert!(validate_client(&ok).is_ok());

        let blank = Client::new("c1", "   ", Utc::now());
        assert_eq!(
            validate_client(&blank),
            Err(ValidationError::blank("client name"))
        );

        let negative = ok.clone().with_package("Growth", -5.0);
        assert!(matches!(
            validate_client(&negative),
            Err(ValidationError::InvalidMrr(_))
        ));

        let nan = ok.with_package("Growth", f64::NAN);
        assert!(validate_client(&nan).is_err());
    }

    #[test]
    fn location_requires_client_and_positive_sla() {
        let ok = Location::new("l1", "c1", "Downtown");
        assert!(validate_location(&ok).is_ok());
        assert_eq!(
            validate_location(&Location::new("l1", "", "Downtown")),
            Err(ValidationError::blank("client"))
        );
        assert_eq!(
            validate_location(&ok.with_sla_hours(0)),
            Err(ValidationError::ZeroSlaHours)
        );
    }

    #[test]
    fn user_requires_plausible_email() {
        let ok = User::new("u1", "Alice", "alice@example.com", Role::Writer);
        assert!(validate_user(&ok).is_ok());
        let bad = User::new("u1", "Alice", "alice.example.com", Role::Writer);
        assert!(matches!(
            validate_user(&bad),
            Err(ValidationError::InvalidEmail(_))
        ));
        let double = User::new("u1", "Alice", "a@b@c", Role::Writer);
        assert!(validate_user(&double).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let mut platforms = vec![
            Platform::Yelp,
            Platform::Google,
            Platform::Yelp,
            Platform::Google,
            Platform::Facebook,
        ];
        dedup_platforms(&mut platforms);
        assert_eq!(
            platforms,
            vec![Platform::Yelp, Platform::Google, Platform::Facebook]
        );
    }
}
