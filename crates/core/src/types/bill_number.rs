//! Bill number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`BillNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BillNumberError {
    /// The input is empty or only whitespace.
    #[error("bill number cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("bill number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The external identifier printed on a purchase receipt.
///
/// Bill numbers are globally unique across all purchases, so two customers
/// cannot claim cashback for the same receipt.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-64 characters after trimming
/// - Comparison is exact (case-sensitive)
///
/// ## Examples
///
/// ```
/// use cashback_core::BillNumber;
///
/// assert_eq!(BillNumber::parse("  B-1001 ").unwrap().as_str(), "B-1001");
/// assert!(BillNumber::parse("").is_err());
/// assert!(BillNumber::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct BillNumber(String);

impl BillNumber {
    /// Maximum length of a bill number.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `BillNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than 64
    /// characters.
    pub fn parse(s: &str) -> Result<Self, BillNumberError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(BillNumberError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(BillNumberError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the bill number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `BillNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BillNumber {
    type Err = BillNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BillNumber {
    type Error = BillNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BillNumber> for String {
    fn from(bill: BillNumber) -> Self {
        bill.0
    }
}

impl AsRef<str> for BillNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
