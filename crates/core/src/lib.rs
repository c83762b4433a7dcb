//! Cashback Core - purchase and coupon lifecycle engine.
//!
//! Customers submit purchase bills, an administrator verifies them, and each
//! verified purchase gets exactly one redeemable cashback coupon. This crate
//! holds the in-memory stores and the state machine behind that flow:
//!
//! - [`store`] - identity store, purchase ledger and coupon registry, plus
//!   the shared [`CashbackStore`] handle
//! - [`services`] - account and lifecycle operations over the stores
//! - [`models`] - users, purchases and coupons
//! - [`types`] - newtype IDs, validated fields, money and statuses
//! - [`capability`] - clock, random source and credential hasher traits
//!
//! # Architecture
//!
//! No network, disk or HTTP here. Hosts inject a clock, a secure random
//! source and a password hasher, then call into the services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod capability;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

pub use capability::{Clock, CredentialError, CredentialHasher, OsRandom, RandomSource, SystemClock};
pub use error::{CashbackError, ErrorKind};
pub use models::*;
pub use store::{CashbackStore, CashbackStoreBuilder};
pub use types::*;
