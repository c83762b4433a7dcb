//! Purchase domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BillNumber, PurchaseId, UserId, VerificationStatus};

/// A submitted bill awaiting or having completed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    /// Unique purchase ID.
    pub id: PurchaseId,
    /// Customer who submitted the bill.
    pub owner_id: UserId,
    /// Receipt number, unique across all purchases.
    pub bill_number: BillNumber,
    /// Bill total, always positive.
    pub bill_amount: Decimal,
    /// Date printed on the receipt.
    pub purchase_date: NaiveDate,
    /// Whether an administrator has approved the bill.
    pub verification_status: VerificationStatus,
    /// When the bill was submitted.
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    /// Whether the purchase has been verified.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verification_status.is_verified()
    }
}

/// Purchase submission input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub bill_number: String,
    pub bill_amount: Decimal,
    pub purchase_date: NaiveDate,
}

/// Which purchases a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseScope {
    /// Only purchases submitted by this user.
    Owner(UserId),
    /// Every purchase in the ledger.
    All,
}
