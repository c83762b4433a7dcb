//! Domain models.
//!
//! Plain data carried between the stores, the services and callers.

pub mod coupon;
pub mod purchase;
pub mod user;

pub use coupon::{Coupon, CouponReceipt};
pub use purchase::{NewPurchase, Purchase, PurchaseScope};
pub use user::{NewUser, User, UserProfile};
