//! Administrator dashboard endpoints.

use axum::{Json, extract::State};

use cashback_core::User;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::Stats;
use crate::state::AppState;

/// All registered users, in registration order.
///
/// GET /api/users
///
/// # Errors
///
/// `401`/`403` unless an administrator is logged in.
pub async fn users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    Ok(Json(state.store().accounts().list_users()?))
}

/// User, purchase and coupon counts.
///
/// GET /api/stats
///
/// # Errors
///
/// `401`/`403` unless an administrator is logged in.
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Stats>> {
    let store = state.store();

    Ok(Json(Stats {
        user_count: store.accounts().user_count()?,
        purchase_count: store.purchases().count()?,
        coupon_count: store.coupons().count()?,
    }))
}
