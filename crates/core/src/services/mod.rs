//! Operations built on top of the stores.
//!
//! Services borrow a [`CashbackStore`](crate::store::CashbackStore) for the
//! duration of a call; get them through `store.accounts()` and
//! `store.lifecycle()`.

pub mod accounts;
pub mod lifecycle;

pub use accounts::AccountService;
pub use lifecycle::LifecycleService;
