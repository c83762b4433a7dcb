//! Core types for the cashback program.
//!
//! This module provides type-safe wrappers for IDs, validated input fields,
//! money amounts and lifecycle statuses.

pub mod bill_number;
pub mod coupon_code;
pub mod id;
pub mod money;
pub mod profile;
pub mod status;

pub use bill_number::{BillNumber, BillNumberError};
pub use coupon_code::{CouponCode, CouponCodeError};
pub use id::*;
pub use money::{
    AmountError, CashbackRate, MAX_BILL_AMOUNT, validate_bill_amount, validate_cashback_amount,
};
pub use profile::{PhoneNumber, ProfileError, Username};
pub use status::*;
