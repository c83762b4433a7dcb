//! User domain types.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

use crate::types::profile::required_text;
use crate::types::{PhoneNumber, ProfileError, UserId, Username};

/// A registered customer or administrator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID, assigned in registration order.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Opaque password hash produced by the configured hasher.
    #[serde(skip_serializing)]
    pub credential_hash: String,
    /// Display name used on reports.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Contact phone number.
    pub phone: PhoneNumber,
    /// Whether the user may verify purchases and redeem coupons.
    pub is_admin: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Registration input, as received from the caller.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: SecretString,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub is_admin: bool,
}

/// Registration input after field validation.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub username: Username,
    pub name: String,
    pub address: String,
    pub phone: PhoneNumber,
    pub is_admin: bool,
}

impl NewUser {
    /// Validate every profile field.
    ///
    /// # Errors
    ///
    /// Returns the first `ProfileError` encountered.
    pub fn validate(&self) -> Result<UserProfile, ProfileError> {
        Ok(UserProfile {
            username: Username::parse(&self.username)?,
            name: required_text("name", &self.name)?,
            address: required_text("address", &self.address)?,
            phone: PhoneNumber::parse(&self.phone)?,
            is_admin: self.is_admin,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            username: "alice".to_owned(),
            password: SecretString::from("correct horse battery"),
            name: "Alice".to_owned(),
            address: "12 Market Road".to_owned(),
            phone: "9876543210".to_owned(),
            is_admin: false,
        }
    }

    #[test]
    fn test_validate_ok() {
        let profile = new_user().validate().unwrap();
        assert_eq!(profile.username.as_str(), "alice");
        assert!(!profile.is_admin);
    }

    #[test]
    fn test_validate_rejects_bad_phone() {
        let mut user = new_user();
        user.phone = "12345".to_owned();
        assert!(matches!(
            user.validate(),
            Err(ProfileError::InvalidPhone { .. })
        ));
    }

    #[test]
    fn test_serialize_hides_credential_hash() {
        let user = User {
            id: UserId::new(1),
            username: Username::parse("alice").unwrap(),
            credential_hash: "$argon2id$secret".to_owned(),
            name: "Alice".to_owned(),
            address: "12 Market Road".to_owned(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            is_admin: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"isAdmin\":false"));
    }
}
