//! Coupon Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::coupons::records::CouponRecord;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,
    pub code: String,
    pub description: Option<String>,

    /// `percentage` or `fixed`
    pub discount_type: String,

    /// Percent for percentage coupons, paise for fixed ones
    pub discount_value: u64,

    pub max_discount: Option<u64>,
    pub min_order_value: Option<u64>,
    pub max_order_value: Option<u64>,
    pub starts_at: Option<String>,
    pub expires_at: Option<String>,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub per_user_limit: Option<u32>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<CouponRecord> for CouponResponse {
    fn from(coupon: CouponRecord) -> Self {
        Self {
            uuid: coupon.uuid.into(),
            code: coupon.code,
            description: coupon.description,
            discount_type: coupon.discount_type.to_string(),
            discount_value: coupon.discount_value,
            max_discount: coupon.max_discount,
            min_order_value: coupon.min_order_value,
            max_order_value: coupon.max_order_value,
            starts_at: coupon.starts_at.map(|at| at.to_string()),
            expires_at: coupon.expires_at.map(|at| at.to_string()),
            usage_limit: coupon.usage_limit,
            used_count: coupon.used_count,
            per_user_limit: coupon.per_user_limit,
            is_active: coupon.is_active,
            created_at: coupon.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponsResponse {
    pub coupons: Vec<CouponResponse>,
}

/// Coupon Index Handler
#[endpoint(
    tags("admin"),
    summary = "List Coupons",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CouponsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let coupons = state
        .app
        .coupons
        .list_coupons()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponsResponse {
        coupons: coupons.into_iter().map(Into::into).collect(),
    }))
}
