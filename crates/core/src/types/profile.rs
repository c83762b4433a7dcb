//! Validated user profile fields.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when validating profile fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Username is empty after trimming.
    #[error("username cannot be empty")]
    EmptyUsername,
    /// Username is too long.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Username contains whitespace.
    #[error("username cannot contain whitespace")]
    UsernameWhitespace,
    /// Phone number is not exactly ten digits.
    #[error("phone number must be exactly {digits} digits")]
    InvalidPhone {
        /// Required number of digits.
        digits: usize,
    },
    /// A required free-text field is blank.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),
}

/// A unique login name.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-64 characters, no inner whitespace
/// - Comparison is exact (case-sensitive)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, or contains
    /// whitespace.
    pub fn parse(s: &str) -> Result<Self, ProfileError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ProfileError::EmptyUsername);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ProfileError::UsernameTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ProfileError::UsernameWhitespace);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

/// A ten-digit contact phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Required number of digits.
    pub const DIGITS: usize = 10;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidPhone` unless the trimmed input is
    /// exactly ten ASCII digits.
    pub fn parse(s: &str) -> Result<Self, ProfileError> {
        let trimmed = s.trim();
        if trimmed.len() != Self::DIGITS || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProfileError::InvalidPhone {
                digits: Self::DIGITS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

/// Trim a required free-text field, rejecting blanks.
///
/// # Errors
///
/// Returns `ProfileError::MissingField` naming `field` if the value is blank.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}
