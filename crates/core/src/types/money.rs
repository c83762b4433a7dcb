//! Decimal money amounts and the cashback rate.
//!
//! All amounts use [`Decimal`] so that percentages of bill totals are exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors raised when an amount or rate is out of range.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Bill amounts must be strictly positive.
    #[error("bill amount must be greater than zero (got {0})")]
    NotPositive(Decimal),
    /// Cashback amounts cannot be negative.
    #[error("cashback amount cannot be negative (got {0})")]
    Negative(Decimal),
    /// Bill amounts are capped at [`MAX_BILL_AMOUNT`].
    #[error("bill amount cannot exceed {max} (got {amount})")]
    TooLarge {
        /// The rejected amount.
        amount: Decimal,
        /// The cap.
        max: Decimal,
    },
    /// Rates are percentages between 0 and 100.
    #[error("cashback rate must be between 0 and 100 percent (got {0})")]
    RateOutOfRange(Decimal),
    /// Applying the rate to this amount does not fit in a `Decimal`.
    #[error("cashback on {0} is out of range")]
    Overflow(Decimal),
}

/// Decimal places kept on computed cashback amounts.
pub const CASHBACK_SCALE: u32 = 2;

/// Largest bill the ledger accepts (one trillion).
pub const MAX_BILL_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Check that a submitted bill amount is usable.
///
/// # Errors
///
/// Returns `AmountError::NotPositive` if `amount <= 0` and
/// `AmountError::TooLarge` above [`MAX_BILL_AMOUNT`].
pub fn validate_bill_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }
    if amount > MAX_BILL_AMOUNT {
        return Err(AmountError::TooLarge {
            amount,
            max: MAX_BILL_AMOUNT,
        });
    }
    Ok(amount)
}

/// Check that a cashback amount can be placed on a coupon.
///
/// # Errors
///
/// Returns `AmountError::Negative` if `amount < 0`.
pub fn validate_cashback_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount < Decimal::ZERO {
        return Err(AmountError::Negative(amount));
    }
    Ok(amount)
}

/// Percentage of a bill paid back when the verifier does not name an amount.
///
/// ```
/// use cashback_core::CashbackRate;
/// use rust_decimal::Decimal;
///
/// let rate = CashbackRate::default();
/// assert_eq!(rate.cashback_for(Decimal::from(1000)), Ok(Decimal::from(40)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct CashbackRate(Decimal);

impl CashbackRate {
    /// House default: 4 percent.
    pub const DEFAULT_PERCENT: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

    /// Create a rate from a percentage (`4` means 4%).
    ///
    /// # Errors
    ///
    /// Returns `AmountError::RateOutOfRange` unless `0 <= percent <= 100`.
    pub fn from_percent(percent: Decimal) -> Result<Self, AmountError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(AmountError::RateOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// The rate as a percentage.
    #[must_use]
    pub const fn percent(self) -> Decimal {
        self.0
    }

    /// Cashback owed on `bill_amount`, rounded half-to-even to cents.
    ///
    /// # Errors
    ///
    /// Returns `AmountError::Overflow` if the product does not fit in a
    /// `Decimal`.
    pub fn cashback_for(self, bill_amount: Decimal) -> Result<Decimal, AmountError> {
        bill_amount
            .checked_mul(self.0)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(|amount| amount.round_dp(CASHBACK_SCALE))
            .ok_or(AmountError::Overflow(bill_amount))
    }
}

impl Default for CashbackRate {
    fn default() -> Self {
        Self(Self::DEFAULT_PERCENT)
    }
}

impl TryFrom<Decimal> for CashbackRate {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_percent(value)
    }
}

impl From<CashbackRate> for Decimal {
    fn from(rate: CashbackRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for CashbackRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
