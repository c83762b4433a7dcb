//! Coupon code type.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::RandomSource;

/// Errors that can occur when parsing a [`CouponCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponCodeError {
    /// The input is not exactly [`CouponCode::LENGTH`] characters.
    #[error("coupon code must be exactly {expected} characters")]
    WrongLength {
        /// Required length.
        expected: usize,
    },
    /// The input contains something other than `0-9` and `A-F`.
    #[error("coupon code must be uppercase hexadecimal")]
    NotHex,
}

/// A redeemable coupon code.
///
/// Codes are [`CouponCode::BYTES`] random bytes rendered as uppercase
/// hexadecimal, giving a fixed length of [`CouponCode::LENGTH`] characters.
///
/// ```
/// use cashback_core::CouponCode;
///
/// assert!(CouponCode::parse("0123456789ABCDEF").is_ok());
/// assert!(CouponCode::parse("0123456789abcdef").is_err());
/// assert!(CouponCode::parse("ABC").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Number of random bytes behind each code.
    pub const BYTES: usize = 8;

    /// Rendered length in characters.
    pub const LENGTH: usize = Self::BYTES * 2;

    /// Draw a fresh code from a secure random source.
    ///
    /// Uniqueness against already issued codes is the registry's job.
    #[must_use]
    pub fn generate(source: &dyn RandomSource) -> Self {
        let mut bytes = [0_u8; Self::BYTES];
        source.fill_bytes(&mut bytes);
        Self(hex::encode_upper(bytes))
    }

    /// Parse a `CouponCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 16 uppercase hex digits.
    pub fn parse(s: &str) -> Result<Self, CouponCodeError> {
        if s.len() != Self::LENGTH {
            return Err(CouponCodeError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, 'A'..='F'))
        {
            return Err(CouponCodeError::NotHex);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
