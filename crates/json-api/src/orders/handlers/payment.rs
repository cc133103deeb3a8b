//! Initiate Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::payments::models::PaymentSession;

use crate::{extensions::*, orders::errors::payment_status_error, state::State};

/// What the checkout widget needs to take the payment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentSessionResponse {
    pub gateway_order_id: String,

    /// Minor currency units
    pub amount: u64,

    pub currency: String,

    /// Public key the widget authenticates with
    pub key_id: String,
}

impl From<PaymentSession> for PaymentSessionResponse {
    fn from(session: PaymentSession) -> Self {
        PaymentSessionResponse {
            gateway_order_id: session.gateway_order_id,
            amount: session.amount,
            currency: session.currency,
            key_id: session.key_id,
        }
    }
}

/// Initiate Payment Handler
///
/// Opens, or reopens, a gateway checkout for a pending online order.
#[endpoint(
    tags("payments"),
    summary = "Initiate Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment session"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order cannot be paid online"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway is unavailable"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PaymentSessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let session = state
        .app
        .payments
        .initiate_payment(user.uuid, order.into_inner().into())
        .await
        .map_err(payment_status_error)?;

    Ok(Json(session.into()))
}
