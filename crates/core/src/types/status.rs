//! Status enums for purchases and coupons.

use serde::{Deserialize, Serialize};

/// Verification status of a submitted purchase.
///
/// A purchase starts `Pending` and moves to `Verified` once; there is no way
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
}

impl VerificationStatus {
    /// Whether the purchase has been approved by an administrator.
    #[must_use]
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            _ => Err(format!("invalid verification status: {s}")),
        }
    }
}

/// Redemption status of a cashback coupon.
///
/// `Redeemed` is terminal: the coupon's amount and code are frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[default]
    Active,
    Redeemed,
}

impl CouponStatus {
    /// Whether the coupon has been consumed.
    #[must_use]
    pub const fn is_redeemed(self) -> bool {
        matches!(self, Self::Redeemed)
    }
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Redeemed => write!(f, "redeemed"),
        }
    }
}

impl std::str::FromStr for CouponStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "redeemed" => Ok(Self::Redeemed),
            _ => Err(format!("invalid coupon status: {s}")),
        }
    }
}
