//! Purchase ledger.
//!
//! Holds purchase submissions, enforces bill-number uniqueness across all
//! owners and tracks verification status. Listings come back in no
//! particular order; sorting for display is the caller's business.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::{read, write};
use crate::error::{CashbackError, Result};
use crate::models::Purchase;
use crate::types::id::IdSequence;
use crate::types::{BillNumber, PurchaseId, UserId, VerificationStatus, validate_bill_amount};

const STORE: &str = "purchase";

/// In-memory purchase table.
#[derive(Debug)]
pub struct PurchaseLedger {
    inner: RwLock<PurchaseTable>,
}

#[derive(Debug)]
struct PurchaseTable {
    seq: IdSequence,
    by_id: HashMap<PurchaseId, Purchase>,
    by_bill_number: HashMap<BillNumber, PurchaseId>,
    by_owner: HashMap<UserId, Vec<PurchaseId>>,
}

impl Default for PurchaseLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl PurchaseLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PurchaseTable {
                seq: IdSequence::new(),
                by_id: HashMap::new(),
                by_bill_number: HashMap::new(),
                by_owner: HashMap::new(),
            }),
        }
    }

    /// Record a new pending purchase.
    ///
    /// Input is validated before the ledger is locked, so a rejected call
    /// leaves no trace.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::InvalidBillNumber` for a blank or oversized bill
    /// number, `CashbackError::InvalidAmount` if `bill_amount <= 0`, and
    /// `CashbackError::DuplicateBillNumber` if any purchase already uses the
    /// bill number.
    pub fn create(
        &self,
        owner_id: UserId,
        bill_number: &str,
        bill_amount: Decimal,
        purchase_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Purchase> {
        let bill_number = BillNumber::parse(bill_number)?;
        let bill_amount = validate_bill_amount(bill_amount)?;

        let mut table = write(&self.inner, STORE)?;

        if table.by_bill_number.contains_key(&bill_number) {
            return Err(CashbackError::DuplicateBillNumber(bill_number.into_inner()));
        }

        let id = PurchaseId::new(
            table
                .seq
                .take()
                .ok_or(CashbackError::IdSpaceExhausted(STORE))?,
        );
        let purchase = Purchase {
            id,
            owner_id,
            bill_number,
            bill_amount,
            purchase_date,
            verification_status: VerificationStatus::Pending,
            created_at,
        };

        table
            .by_bill_number
            .insert(purchase.bill_number.clone(), id);
        table.by_owner.entry(owner_id).or_default().push(id);
        table.by_id.insert(id, purchase.clone());
        drop(table);

        tracing::info!(
            purchase_id = %id,
            owner_id = %owner_id,
            bill_number = %purchase.bill_number,
            bill_amount = %purchase.bill_amount,
            "purchase submitted"
        );
        Ok(purchase)
    }

    /// Look up a purchase by ID.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the ledger is unusable.
    pub fn get_by_id(&self, id: PurchaseId) -> Result<Option<Purchase>> {
        Ok(read(&self.inner, STORE)?.by_id.get(&id).cloned())
    }

    /// Purchases submitted by one user.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the ledger is unusable.
    pub fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Purchase>> {
        let table = read(&self.inner, STORE)?;
        Ok(table
            .by_owner
            .get(&owner_id)
            .into_iter()
            .flatten()
            .filter_map(|id| table.by_id.get(id))
            .cloned()
            .collect())
    }

    /// Every purchase in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the ledger is unusable.
    pub fn list_all(&self) -> Result<Vec<Purchase>> {
        Ok(read(&self.inner, STORE)?.by_id.values().cloned().collect())
    }

    /// Number of recorded purchases.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::LockPoisoned` if the ledger is unusable.
    pub fn count(&self) -> Result<usize> {
        Ok(read(&self.inner, STORE)?.by_id.len())
    }

    /// Move a purchase to `Verified`.
    ///
    /// Calling this on an already verified purchase is a no-op that returns
    /// the current record, so verification can be repeated to adjust the
    /// cashback amount.
    ///
    /// # Errors
    ///
    /// Returns `CashbackError::PurchaseNotFound` if the ID is unknown.
    pub fn mark_verified(&self, id: PurchaseId) -> Result<Purchase> {
        let mut table = write(&self.inner, STORE)?;
        let purchase = table
            .by_id
            .get_mut(&id)
            .ok_or(CashbackError::PurchaseNotFound(id))?;

        if !purchase.is_verified() {
            purchase.verification_status = VerificationStatus::Verified;
            tracing::info!(purchase_id = %id, bill_number = %purchase.bill_number, "purchase verified");
        }

        Ok(purchase.clone())
    }
}
