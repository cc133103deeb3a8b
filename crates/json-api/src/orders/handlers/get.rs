//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{OrderItemRecord, OrderRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-readable reference, `ORD-YYYYMMDD-XXXXXXXX`
    pub order_number: String,

    pub status: String,
    pub payment_method: String,
    pub payment_status: String,

    /// Amounts are in paise
    pub subtotal: u64,
    pub discount: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,

    pub coupon_code: Option<String>,
    pub shipping_address_uuid: Uuid,
    pub billing_address_uuid: Uuid,
    pub gateway_order_id: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub paid_at: Option<String>,
    pub delivered_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            order_number: order.order_number,
            status: order.status.to_string(),
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            subtotal: order.totals.subtotal,
            discount: order.totals.discount,
            tax: order.totals.tax,
            shipping: order.totals.shipping,
            total: order.totals.total,
            coupon_code: order.coupon_code,
            shipping_address_uuid: order.shipping_address_uuid.into(),
            billing_address_uuid: order.billing_address_uuid.into(),
            gateway_order_id: order.gateway_order_id,
            notes: order.notes,
            cancellation_reason: order.cancellation_reason,
            items: order.items.into_iter().map(Into::into).collect(),
            paid_at: order.paid_at.map(|at| at.to_string()),
            delivered_at: order.delivered_at.map(|at| at.to_string()),
            cancelled_at: order.cancelled_at.map(|at| at.to_string()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// A line captured at checkout. Later catalogue edits do not change it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,
    pub name: String,
    pub variant_name: Option<String>,
    pub image_url: Option<String>,
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            variant_uuid: item.variant_uuid.map(Into::into),
            name: item.name,
            variant_name: item.variant_name,
            image_url: item.image_url,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total,
        }
    }
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user.uuid, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
