//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Auth
//! POST /api/register                - Register and log in
//! POST /api/login                   - Log in
//! POST /api/logout                  - Log out
//! GET  /api/user                    - Current user
//!
//! # Purchases (requires auth)
//! GET  /api/purchases               - Own purchases (all, for admins)
//! POST /api/purchases               - Submit a bill
//! POST /api/purchases/{id}/verify   - Verify and issue coupon (admin)
//! POST /api/purchases/{id}/redeem   - Redeem coupon (admin)
//!
//! # Coupons (requires auth)
//! GET  /api/coupons                 - Own coupons
//! GET  /api/admin/coupons           - All coupons (admin)
//!
//! # Dashboard (admin)
//! GET  /api/users                   - Registered users
//! GET  /api/stats                   - Counters
//! ```

pub mod admin;
pub mod auth;
pub mod coupons;
pub mod purchases;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
}

/// Create the purchase routes router.
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(purchases::list).post(purchases::submit))
        .route("/{id}/verify", post(purchases::verify))
        .route("/{id}/redeem", post(purchases::redeem))
}

/// Create the admin dashboard routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::users))
        .route("/stats", get(admin::stats))
        .route("/admin/coupons", get(coupons::list_all))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(auth_routes())
        .nest("/purchases", purchase_routes())
        .route("/coupons", get(coupons::list_own))
        .merge(admin_routes());

    Router::new().nest("/api", api)
}
