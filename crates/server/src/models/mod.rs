//! Request, response and session types for the HTTP API.

pub mod api;
pub mod session;

pub use api::{
    LoginRequest, PurchaseView, RegisterRequest, Stats, VerifyRequest, sort_for_review,
};
pub use session::{CurrentUser, keys as session_keys};
