//! Engine error type.
//!
//! Every store and service operation returns [`CashbackError`]. Callers that
//! only need the broad category (to pick an HTTP status, say) use
//! [`CashbackError::kind`].

use thiserror::Error;

use crate::capability::CredentialError;
use crate::types::{AmountError, BillNumberError, CouponCode, ProfileError, PurchaseId, UserId};

/// Broad category of a [`CashbackError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input rejected before any mutation; retry with corrected input.
    Validation,
    /// Uniqueness rule violated.
    Conflict,
    /// Referenced entity does not exist.
    NotFound,
    /// Entity exists but is in the wrong state for the operation.
    State,
    /// Something broke inside the engine.
    Internal,
}

/// Errors returned by the cashback engine.
#[derive(Debug, Error)]
pub enum CashbackError {
    /// Amount or rate out of range.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Bill number failed validation.
    #[error("invalid bill number: {0}")]
    InvalidBillNumber(#[from] BillNumberError),

    /// A profile field failed validation.
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    /// Username is already registered.
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// Bill number has already been submitted (by anyone).
    #[error("bill number already exists: {0}")]
    DuplicateBillNumber(String),

    /// No user with this ID.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No purchase with this ID.
    #[error("purchase not found: {0}")]
    PurchaseNotFound(PurchaseId),

    /// No coupon has been issued for this purchase.
    #[error("no coupon issued for purchase {0}")]
    CouponNotFound(PurchaseId),

    /// Coupon was already redeemed and is frozen.
    #[error("coupon {code} for purchase {purchase_id} was already redeemed")]
    AlreadyRedeemed {
        /// Purchase the coupon belongs to.
        purchase_id: PurchaseId,
        /// The frozen coupon code.
        code: CouponCode,
    },

    /// Could not draw an unused coupon code within the retry bound.
    #[error("could not generate a unique coupon code after {attempts} attempts")]
    CodeSpaceExhausted {
        /// How many codes were drawn.
        attempts: usize,
    },

    /// The ID sequence for a store ran out.
    #[error("{0} id space exhausted")]
    IdSpaceExhausted(&'static str),

    /// A store lock was poisoned by a panicking writer.
    #[error("{0} store lock poisoned")]
    LockPoisoned(&'static str),

    /// Password hashing failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl CashbackError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_) | Self::InvalidBillNumber(_) | Self::InvalidProfile(_) => {
                ErrorKind::Validation
            }
            Self::DuplicateUsername(_) | Self::DuplicateBillNumber(_) => ErrorKind::Conflict,
            Self::UserNotFound(_) | Self::PurchaseNotFound(_) | Self::CouponNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::AlreadyRedeemed { .. } => ErrorKind::State,
            Self::CodeSpaceExhausted { .. }
            | Self::IdSpaceExhausted(_)
            | Self::LockPoisoned(_)
            | Self::Credential(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for `CashbackError`.
pub type Result<T> = std::result::Result<T, CashbackError>;
