//! Coupon domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{BillNumber, CouponCode, CouponId, CouponStatus, PurchaseId};

/// A cashback voucher issued for exactly one verified purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Unique coupon ID.
    pub id: CouponId,
    /// Purchase the coupon was issued for. At most one coupon per purchase.
    pub purchase_id: PurchaseId,
    /// Redeemable code. Assigned once, never changes.
    pub coupon_code: CouponCode,
    /// Cashback value. Adjustable until the coupon is redeemed.
    pub amount: Decimal,
    /// Redemption status.
    pub status: CouponStatus,
    /// When the coupon was first issued.
    pub created_at: DateTime<Utc>,
    /// When the coupon was redeemed, if it has been.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redeemed_at: Option<DateTime<Utc>>,
}

/// Result of a verify or redeem call: the coupon plus the bill it pays out on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponReceipt {
    pub coupon: Coupon,
    pub bill_number: BillNumber,
}
