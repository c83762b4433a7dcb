//! Coupon registry.
//!
//! Holds at most one coupon per purchase, hands out unique codes and tracks
//! redemption. Lookups by purchase go through a direct index.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::purchases::PurchaseLedger;
use super::{read, write};
use crate::capability::RandomSource;
use crate::error::{CashbackError, Result};
use crate::models::Coupon;
use crate::types::id::IdSequence;
use crate::types::{CouponCode, CouponId, CouponStatus, PurchaseId, UserId, validate_cashback_amount};

const STORE: &str = "coupon";

/// How many codes to draw before giving up on finding an unused one.
///
/// With 64-bit codes a single collision is already astronomically unlikely;
/// the bound only keeps a broken random source from spinning forever.
pub const MAX_CODE_ATTEMPTS: usize = 16;

/// In-memory coupon table.
#[derive(Debug)]
pub struct CouponRegistry {
    inner: RwLock<CouponTable>,
}

#[derive(Debug)]
struct CouponTable {
    seq: IdSequence,
    by_id: HashMap<CouponId, Coupon>,
    by_purchase: HashMap<PurchaseId, CouponId>,
    codes: HashSet<CouponCode>,
}

impl CouponTable {
    fn fresh_code(&self, random: &dyn RandomSource) -> Result<CouponCode> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = CouponCode::generate(random);
            if !self.codes.contains(&code) {
                return Ok(code);
            }
            tracing::warn!("coupon code collision, drawing again");
        }
        Err(CashbackError::CodeSpaceExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}

impl Default for CouponRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CouponRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(CouponTable {
                seq: IdSequence::new(),
                by_id: HashMap::new(),
                by_purchase: HashMap::new(),
                codes: HashSet::new(),
            }),
        }
    }

    /// Issue a coupon for a purchase, or adjust the amount of the one it has.
    ///
    /// A new coupon gets a fresh unique code and starts `Active`. An existing
    /// coupon keeps its code; only `amount` changes. The caller is
    /// responsible for checking that the purchase exists and is verified.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::InvalidAmount` if `amount < 0`,
    /// `CashbackError::AlreadyRedeemed` if the existing coupon is frozen, and
    /// `CashbackError::CodeSpaceExhausted` if no unused code could be drawn.
    pub fn issue_or_update(
        &self,
        purchase_id: PurchaseId,
        amount: Decimal,
        random: &dyn RandomSource,
        now: DateTime<Utc>,
    ) -> Result<Coupon> {
        let amount = validate_cashback_amount(amount)?;

        let mut table = write(&self.inner, STORE)?;

        if let Some(&coupon_id) = table.by_purchase.get(&purchase_id) {
            let coupon = table
                .by_id
                .get_mut(&coupon_id)
                .ok_or(CashbackError::CouponNotFound(purchase_id))?;

            if coupon.status.is_redeemed() {
                return Err(CashbackError::AlreadyRedeemed {
                    purchase_id,
                    code: coupon.coupon_code.clone(),
                });
            }

            let previous = coupon.amount;
            coupon.amount = amount;
            tracing::info!(
                coupon_id = %coupon_id,
                purchase_id = %purchase_id,
                previous = %previous,
                amount = %amount,
                "coupon amount updated"
            );
            return Ok(coupon.clone());
        }

        let coupon_code = table.fresh_code(random)?;
        let id = CouponId::new(
            table
                .seq
                .take()
                .ok_or(CashbackError::IdSpaceExhausted(STORE))?,
        );
        let coupon = Coupon {
            id,
            purchase_id,
            coupon_code,
            amount,
            status: CouponStatus::Active,
            created_at: now,
            redeemed_at: None,
        };

        table.codes.insert(coupon.coupon_code.clone());
        table.by_purchase.insert(purchase_id, id);
        table.by_id.insert(id, coupon.clone());
        drop(table);

        tracing::info!(coupon_id = %id, purchase_id = %purchase_id, amount = %amount, "coupon issued");
        Ok(coupon)
    }

    /// Mark the purchase's coupon as redeemed.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::CouponNotFound` if no coupon was issued for the
    /// purchase and `CashbackError::AlreadyRedeemed` if it was already used.
    pub fn redeem(&self, purchase_id: PurchaseId, now: DateTime<Utc>) -> Result<Coupon> {
        let mut table = write(&self.inner, STORE)?;

        let coupon_id = *table
            .by_purchase
            .get(&purchase_id)
            .ok_or(CashbackError::CouponNotFound(purchase_id))?;
        let coupon = table
            .by_id
            .get_mut(&coupon_id)
            .ok_or(CashbackError::CouponNotFound(purchase_id))?;

        if coupon.status.is_redeemed() {
            return Err(CashbackError::AlreadyRedeemed {
                purchase_id,
                code: coupon.coupon_code.clone(),
            });
        }

        coupon.status = CouponStatus::Redeemed;
        coupon.redeemed_at = Some(now);
        tracing::info!(coupon_id = %coupon_id, purchase_id = %purchase_id, amount = %coupon.amount, "coupon redeemed");

        Ok(coupon.clone())
    }

    /// The coupon issued for a purchase, if any.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the registry is unusable.
    pub fn get_by_purchase(&self, purchase_id: PurchaseId) -> Result<Option<Coupon>> {
        let table = read(&self.inner, STORE)?;
        Ok(table
            .by_purchase
            .get(&purchase_id)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    /// Coupons of one owner's verified purchases, newest first.
    ///
    /// Joins against the ledger by purchase ID; coupons on other owners'
    /// purchases or on purchases that are still pending never appear.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if either store is unusable.
    pub fn get_by_user(&self, ledger: &PurchaseLedger, owner_id: UserId) -> Result<Vec<Coupon>> {
        let verified: Vec<PurchaseId> = ledger
            .list_by_owner(owner_id)?
            .into_iter()
            .filter(|p| p.is_verified())
            .map(|p| p.id)
            .collect();

        let table = read(&self.inner, STORE)?;
        let mut coupons: Vec<Coupon> = verified
            .iter()
            .filter_map(|purchase_id| table.by_purchase.get(purchase_id))
            .filter_map(|id| table.by_id.get(id))
            .cloned()
            .collect();
        drop(table);

        sort_newest_first(&mut coupons);
        Ok(coupons)
    }

    /// Every coupon, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the registry is unusable.
    pub fn list_all(&self) -> Result<Vec<Coupon>> {
        let mut coupons: Vec<Coupon> = read(&self.inner, STORE)?.by_id.values().cloned().collect();
        sort_newest_first(&mut coupons);
        Ok(coupons)
    }

    /// Number of issued coupons.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the registry is unusable.
    pub fn count(&self) -> Result<usize> {
        Ok(read(&self.inner, STORE)?.by_id.len())
    }
}

fn sort_newest_first(coupons: &mut [Coupon]) {
    coupons.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
