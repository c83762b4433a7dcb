//! Purchase submission, listing, verification and redemption.

use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use cashback_core::{CouponReceipt, NewPurchase, Purchase, PurchaseId, PurchaseScope};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{PurchaseView, VerifyRequest, sort_for_review};
use crate::state::AppState;

/// List purchases.
///
/// GET /api/purchases
///
/// Customers see their own bills. Administrators see every bill with the
/// owner's name, pending ones first.
///
/// # Errors
///
/// `401` without a session user.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<PurchaseView>>> {
    let store = state.store();

    let mut views: Vec<PurchaseView> = if user.is_admin {
        let names: HashMap<_, _> = store
            .accounts()
            .list_users()?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        store
            .lifecycle()
            .list_purchases(PurchaseScope::All)?
            .into_iter()
            .map(|purchase| {
                let owner_name = names.get(&purchase.owner_id).cloned();
                PurchaseView {
                    purchase,
                    owner_name,
                }
            })
            .collect()
    } else {
        store
            .lifecycle()
            .list_purchases(PurchaseScope::Owner(user.id))?
            .into_iter()
            .map(PurchaseView::from)
            .collect()
    };

    sort_for_review(&mut views);
    Ok(Json(views))
}

/// Submit a purchase bill.
///
/// POST /api/purchases
///
/// # Errors
///
/// `400` for a non-positive or oversized amount or a bad bill number, `409` when the bill
/// number was already submitted by anyone.
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<NewPurchase>,
) -> Result<(StatusCode, Json<Purchase>)> {
    let purchase = state.store().lifecycle().submit_purchase(user.id, &req)?;

    add_breadcrumb(
        "purchase",
        "Submitted purchase",
        &[
            ("purchase_id", purchase.id.to_string()),
            ("bill_number", purchase.bill_number.to_string()),
        ],
    );

    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Verify a purchase and issue its coupon.
///
/// POST /api/purchases/{id}/verify
///
/// The body is optional. `{ "cashbackAmount": "75" }` sets the coupon value
/// explicitly; otherwise the default rate applies.
///
/// # Errors
///
/// `403` for non-admins, `404` for an unknown purchase, `400` for a negative
/// amount and `409` once the coupon has been redeemed.
pub async fn verify(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(purchase_id): Path<PurchaseId>,
    body: Bytes,
) -> Result<Json<CouponReceipt>> {
    let req: VerifyRequest = if body.iter().all(u8::is_ascii_whitespace) {
        VerifyRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid verify request: {e}")))?
    };

    let receipt = state
        .store()
        .lifecycle()
        .verify(purchase_id, req.cashback_amount)?;

    tracing::info!(
        admin_id = %admin.id,
        purchase_id = %purchase_id,
        coupon_code = %receipt.coupon.coupon_code,
        amount = %receipt.coupon.amount,
        "purchase verified"
    );

    Ok(Json(receipt))
}

/// Redeem the coupon for a purchase.
///
/// POST /api/purchases/{id}/redeem
///
/// # Errors
///
/// `403` for non-admins, `404` when the purchase or its coupon is missing and
/// `409` on a second redemption.
pub async fn redeem(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(purchase_id): Path<PurchaseId>,
) -> Result<Json<CouponReceipt>> {
    let receipt = state.store().lifecycle().redeem(purchase_id)?;

    tracing::info!(
        admin_id = %admin.id,
        purchase_id = %purchase_id,
        coupon_code = %receipt.coupon.coupon_code,
        "coupon redeemed"
    );

    Ok(Json(receipt))
}
