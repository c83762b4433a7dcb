//! Coupon listings.

use axum::{Json, extract::State};

use cashback_core::Coupon;

use crate::error::Result;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// Coupons issued on the current user's verified purchases, newest first.
///
/// GET /api/coupons
///
/// # Errors
///
/// `401` without a session user.
pub async fn list_own(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Coupon>>> {
    Ok(Json(state.store().lifecycle().coupons_for_user(user.id)?))
}

/// Every coupon, newest first.
///
/// GET /api/admin/coupons
///
/// # Errors
///
/// `401`/`403` unless an administrator is logged in.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Coupon>>> {
    Ok(Json(state.store().lifecycle().all_coupons()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::TestApp;

    #[tokio::test]
    async fn test_coupons_scoped_to_owner() {
        let app = TestApp::new();
        let alice = app.register("alice").await;
        let bob = app.register("bob").await;
        let admin = app.admin().await;

        for (bill, cookie) in [("A1", &alice), ("A2", &alice), ("B1", &bob)] {
            app.post_json(
                "/api/purchases",
                &json!({"billNumber": bill, "billAmount": "100", "purchaseDate": "2026-03-01"}),
                Some(cookie),
            )
            .await;
        }
        // A2 stays pending
        app.post_empty("/api/purchases/1/verify", Some(&admin)).await;
        app.post_empty("/api/purchases/3/verify", Some(&admin)).await;

        let (status, body) = app.get("/api/coupons", Some(&alice)).await;
        assert_eq!(status, StatusCode::OK);
        let coupons = body.as_array().unwrap();
        assert_eq!(coupons.len(), 1);
        assert_eq!(coupons[0]["purchaseId"], 1);

        let (_, body) = app.get("/api/coupons", Some(&bob)).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["purchaseId"], 3);

        let (status, body) = app.get("/api/admin/coupons", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_all_coupons_forbidden_for_customers() {
        let app = TestApp::new();
        let alice = app.register("alice").await;
        let (status, _) = app.get("/api/admin/coupons", Some(&alice)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.get("/api/admin/coupons", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
