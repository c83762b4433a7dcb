//! Purchase and coupon lifecycle.
//!
//! ```text
//! pending  --verify(amount?)--> verified   (coupon created/updated)
//! verified --verify(amount?)--> verified   (same code, new amount)
//! verified --redeem-->          coupon redeemed (purchase stays verified)
//! ```
//!
//! Authorization is the caller's job: this service assumes whoever calls
//! `verify` or `redeem` is allowed to.

use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{CashbackError, Result};
use crate::models::{Coupon, CouponReceipt, NewPurchase, Purchase, PurchaseScope};
use crate::store::CashbackStore;
use crate::types::{PurchaseId, UserId, validate_cashback_amount};

/// Coordinates the ledger and the registry.
pub struct LifecycleService<'a> {
    store: &'a CashbackStore,
}

impl<'a> LifecycleService<'a> {
    /// Create a lifecycle service over a store.
    #[must_use]
    pub const fn new(store: &'a CashbackStore) -> Self {
        Self { store }
    }

    /// Submit a bill for cashback on behalf of `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::UserNotFound` for an unknown owner, plus any
    /// error from [`PurchaseLedger::create`](crate::store::PurchaseLedger::create).
    pub fn submit_purchase(&self, owner_id: UserId, purchase: &NewPurchase) -> Result<Purchase> {
        if self.store.users().get_by_id(owner_id)?.is_none() {
            return Err(CashbackError::UserNotFound(owner_id));
        }

        self.store.purchases().create(
            owner_id,
            &purchase.bill_number,
            purchase.bill_amount,
            purchase.purchase_date,
            self.store.clock().now(),
        )
    }

    /// List purchases for one owner or for everyone.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the ledger is unusable.
    pub fn list_purchases(&self, scope: PurchaseScope) -> Result<Vec<Purchase>> {
        match scope {
            PurchaseScope::Owner(owner_id) => self.store.purchases().list_by_owner(owner_id),
            PurchaseScope::All => self.store.purchases().list_all(),
        }
    }

    /// Verify a purchase and issue (or re-price) its coupon.
    ///
    /// With `cashback_amount` set, the coupon carries exactly that amount.
    /// Without it, the store's default rate is applied to the bill amount.
    /// Repeating the call is safe: the purchase stays verified and the
    /// existing coupon keeps its code.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::PurchaseNotFound` for an unknown purchase,
    /// `CashbackError::InvalidAmount` for a negative explicit amount or a
    /// default cashback that cannot be computed (both checked before anything
    /// changes) and `CashbackError::AlreadyRedeemed` if the
    /// coupon has been used.
    #[instrument(skip(self))]
    pub fn verify(
        &self,
        purchase_id: PurchaseId,
        cashback_amount: Option<Decimal>,
    ) -> Result<CouponReceipt> {
        let purchase = self
            .store
            .purchases()
            .get_by_id(purchase_id)?
            .ok_or(CashbackError::PurchaseNotFound(purchase_id))?;

        let amount = match cashback_amount {
            Some(explicit) => validate_cashback_amount(explicit)?,
            None => self.store.default_rate().cashback_for(purchase.bill_amount)?,
        };

        let purchase = self.store.purchases().mark_verified(purchase.id)?;

        let coupon = self.store.coupons().issue_or_update(
            purchase.id,
            amount,
            self.store.random(),
            self.store.clock().now(),
        )?;

        Ok(CouponReceipt {
            coupon,
            bill_number: purchase.bill_number,
        })
    }

    /// Redeem the coupon issued for a purchase.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::PurchaseNotFound` for an unknown purchase,
    /// `CashbackError::CouponNotFound` if it was never verified, and
    /// `CashbackError::AlreadyRedeemed` on a second redemption.
    #[instrument(skip(self))]
    pub fn redeem(&self, purchase_id: PurchaseId) -> Result<CouponReceipt> {
        let purchase = self
            .store
            .purchases()
            .get_by_id(purchase_id)?
            .ok_or(CashbackError::PurchaseNotFound(purchase_id))?;

        let coupon = self
            .store
            .coupons()
            .redeem(purchase.id, self.store.clock().now())?;

        Ok(CouponReceipt {
            coupon,
            bill_number: purchase.bill_number,
        })
    }

    /// Coupons for one user's verified purchases, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if a store is unusable.
    pub fn coupons_for_user(&self, owner_id: UserId) -> Result<Vec<Coupon>> {
        self.store
            .coupons()
            .get_by_user(self.store.purchases(), owner_id)
    }

    /// Every issued coupon, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the registry is unusable.
    pub fn all_coupons(&self) -> Result<Vec<Coupon>> {
        self.store.coupons().list_all()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{new_user, test_store};
    use crate::types::{CouponStatus, MAX_BILL_AMOUNT, VerificationStatus};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bill(number: &str, amount: &str) -> NewPurchase {
        NewPurchase {
            bill_number: number.to_owned(),
            bill_amount: dec(amount),
            purchase_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let lifecycle = store.lifecycle();

        let purchase = lifecycle
            .submit_purchase(alice.id, &bill("B1", "1000"))
            .unwrap();
        assert_eq!(purchase.verification_status, VerificationStatus::Pending);

        let first = lifecycle.verify(purchase.id, None).unwrap();
        assert_eq!(first.bill_number.as_str(), "B1");
        assert_eq!(first.coupon.amount, dec("40"));
        assert_eq!(first.coupon.coupon_code.as_str().len(), 16);
        assert!(
            store
                .purchases()
                .get_by_id(purchase.id)
                .unwrap()
                .unwrap()
                .is_verified()
        );

        let second = lifecycle.verify(purchase.id, Some(dec("75"))).unwrap();
        assert_eq!(second.coupon.coupon_code, first.coupon.coupon_code);
        assert_eq!(second.coupon.amount, dec("75"));

        let redeemed = lifecycle.redeem(purchase.id).unwrap();
        assert_eq!(redeemed.coupon.status, CouponStatus::Redeemed);
        assert_eq!(redeemed.coupon.amount, dec("75"));

        let err = lifecycle.redeem(purchase.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert!(matches!(err, CashbackError::AlreadyRedeemed { .. }));

        let stored = store.coupons().get_by_purchase(purchase.id).unwrap().unwrap();
        assert_eq!(stored.amount, dec("75"));
        assert_eq!(stored.coupon_code, first.coupon.coupon_code);
    }

    #[test]
    fn test_submit_for_unknown_owner() {
        let store = test_store();
        let err = store
            .lifecycle()
            .submit_purchase(UserId::new(42), &bill("B1", "10"))
            .unwrap_err();
        assert!(matches!(err, CashbackError::UserNotFound(_)));
    }

    #[test]
    fn test_negative_bill_leaves_ledger_unchanged() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();

        let err = store
            .lifecycle()
            .submit_purchase(alice.id, &bill("B1", "-5"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.purchases().count().unwrap(), 0);
    }

    #[test]
    fn test_oversized_bill_is_rejected_before_verify() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let lifecycle = store.lifecycle();

        let mut huge = bill("B1", "1");
        huge.bill_amount = Decimal::MAX;
        let err = lifecycle.submit_purchase(alice.id, &huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.purchases().count().unwrap(), 0);

        let mut largest = bill("B2", "1");
        largest.bill_amount = MAX_BILL_AMOUNT;
        let purchase = lifecycle.submit_purchase(alice.id, &largest).unwrap();
        let receipt = lifecycle.verify(purchase.id, None).unwrap();
        assert_eq!(receipt.coupon.amount, dec("40000000000"));
    }

    #[test]
    fn test_duplicate_bill_number_is_conflict() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let bob = store.accounts().register(&new_user("bob")).unwrap();
        let lifecycle = store.lifecycle();

        lifecycle.submit_purchase(alice.id, &bill("B1", "10")).unwrap();
        let err = lifecycle
            .submit_purchase(bob.id, &bill("B1", "99"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_verify_unknown_purchase() {
        let store = test_store();
        let err = store
            .lifecycle()
            .verify(PurchaseId::new(7), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_negative_explicit_amount_does_not_verify() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let lifecycle = store.lifecycle();
        let purchase = lifecycle
            .submit_purchase(alice.id, &bill("B1", "10"))
            .unwrap();

        let err = lifecycle.verify(purchase.id, Some(dec("-1"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let stored = store.purchases().get_by_id(purchase.id).unwrap().unwrap();
        assert_eq!(stored.verification_status, VerificationStatus::Pending);
        assert!(store.coupons().get_by_purchase(purchase.id).unwrap().is_none());
    }

    #[test]
    fn test_redeem_before_verify() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let purchase = store
            .lifecycle()
            .submit_purchase(alice.id, &bill("B1", "10"))
            .unwrap();

        let err = store.lifecycle().redeem(purchase.id).unwrap_err();
        assert!(matches!(err, CashbackError::CouponNotFound(_)));
    }

    #[test]
    fn test_reverify_after_redeem_is_rejected() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let lifecycle = store.lifecycle();
        let purchase = lifecycle
            .submit_purchase(alice.id, &bill("B1", "100"))
            .unwrap();
        lifecycle.verify(purchase.id, None).unwrap();
        lifecycle.redeem(purchase.id).unwrap();

        let err = lifecycle.verify(purchase.id, Some(dec("50"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(
            store
                .coupons()
                .get_by_purchase(purchase.id)
                .unwrap()
                .unwrap()
                .amount,
            dec("4")
        );
    }

    #[test]
    fn test_reverify_repairs_missing_coupon() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let purchase = store
            .lifecycle()
            .submit_purchase(alice.id, &bill("B1", "100"))
            .unwrap();

        // Simulate a crash between the two steps of verification.
        store.purchases().mark_verified(purchase.id).unwrap();
        assert!(store.coupons().get_by_purchase(purchase.id).unwrap().is_none());

        let receipt = store.lifecycle().verify(purchase.id, None).unwrap();
        assert_eq!(receipt.coupon.amount, dec("4"));
    }

    #[test]
    fn test_coupons_for_user_is_scoped() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let bob = store.accounts().register(&new_user("bob")).unwrap();
        let lifecycle = store.lifecycle();

        let a1 = lifecycle.submit_purchase(alice.id, &bill("A1", "100")).unwrap();
        let a2 = lifecycle.submit_purchase(alice.id, &bill("A2", "200")).unwrap();
        let _pending = lifecycle.submit_purchase(alice.id, &bill("A3", "300")).unwrap();
        let b1 = lifecycle.submit_purchase(bob.id, &bill("B1", "100")).unwrap();

        lifecycle.verify(a1.id, None).unwrap();
        lifecycle.verify(b1.id, None).unwrap();
        lifecycle.verify(a2.id, None).unwrap();

        let coupons = lifecycle.coupons_for_user(alice.id).unwrap();
        let purchases: Vec<_> = coupons.iter().map(|c| c.purchase_id).collect();
        assert_eq!(purchases, [a2.id, a1.id]);

        assert_eq!(lifecycle.all_coupons().unwrap().len(), 3);
        assert_eq!(
            lifecycle
                .list_purchases(PurchaseScope::Owner(alice.id))
                .unwrap()
                .len(),
            3
        );
        assert_eq!(lifecycle.list_purchases(PurchaseScope::All).unwrap().len(), 4);
    }

    #[test]
    fn test_concurrent_verify_issues_one_coupon() {
        let store = test_store();
        let alice = store.accounts().register(&new_user("alice")).unwrap();
        let purchase = store
            .lifecycle()
            .submit_purchase(alice.id, &bill("B1", "100"))
            .unwrap();

        let codes: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    s.spawn(move || {
                        store
                            .lifecycle()
                            .verify(purchase.id, Some(Decimal::from(i)))
                            .unwrap()
                            .coupon
                            .coupon_code
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.coupons().count().unwrap(), 1);
        assert!(codes.windows(2).all(|w| w[0] == w[1]));
    }
}
