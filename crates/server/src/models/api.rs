//! JSON request and response bodies.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cashback_core::Purchase;

/// Registration request body.
///
/// No `Debug` derive: the password must never reach a log line.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Verify request body. Every field is optional and so is the body itself.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Exact cashback to award. The default rate applies when absent.
    #[serde(default)]
    pub cashback_amount: Option<Decimal>,
}

/// A purchase as shown in listings, with the owner's display name for
/// reviewers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseView {
    #[serde(flatten)]
    pub purchase: Purchase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

impl From<Purchase> for PurchaseView {
    fn from(purchase: Purchase) -> Self {
        Self {
            purchase,
            owner_name: None,
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub user_count: usize,
    pub purchase_count: usize,
    pub coupon_count: usize,
}

/// Order purchases for review: pending before verified, then newest first.
pub fn sort_for_review(views: &mut [PurchaseView]) {
    views.sort_by(|a, b| review_order(&a.purchase, &b.purchase));
}

fn review_order(a: &Purchase, b: &Purchase) -> Ordering {
    a.is_verified()
        .cmp(&b.is_verified())
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}
