//! Validate Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::coupons::CouponPreview;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateCouponRequest {
    pub code: String,
}

/// What a coupon would do to the caller's current cart.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponPreviewResponse {
    pub code: String,
    pub can_apply: bool,

    /// Why the coupon cannot be applied
    pub reason: Option<String>,

    /// Cart subtotal in paise
    pub subtotal: u64,

    /// Discount the coupon would give, in paise
    pub discount: u64,
}

impl From<CouponPreview> for CouponPreviewResponse {
    fn from(preview: CouponPreview) -> Self {
        Self {
            code: preview.code,
            can_apply: preview.can_apply,
            reason: preview.reason,
            subtotal: preview.subtotal,
            discount: preview.discount,
        }
    }
}

/// Validate Coupon Handler
///
/// A coupon that exists but cannot be applied still answers 200 with `canApply: false`.
#[endpoint(
    tags("coupons"),
    summary = "Preview Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon evaluated against the cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponPreviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let preview = state
        .app
        .coupons
        .validate_coupon(user.uuid, &json.into_inner().code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(preview.into()))
}
