//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::{data::NewOrder, status::PaymentMethod};

use crate::{
    extensions::*,
    observability::observe_checkout,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub shipping_address_id: Uuid,

    /// Defaults to the shipping address
    pub billing_address_id: Option<Uuid>,

    /// `gateway`, `cod` or `card`
    pub payment_method: String,

    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .or_400("paymentMethod must be \"gateway\", \"cod\" or \"card\"")?;

        Ok(NewOrder {
            shipping_address: self.shipping_address_id.into(),
            billing_address: self.billing_address_id.map(Into::into),
            payment_method,
            coupon_code: self
                .coupon_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
            notes: self.notes,
        })
    }
}

/// Create Order Handler
///
/// Checks out the shopper's cart. Stock is reserved and the cart emptied in the same step.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::CONFLICT, description = "Out of stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart or coupon rejected"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let order = json.into_inner().into_new_order()?;
    let payment_method = order.payment_method;

    let order = match state.app.orders.create_order(user.uuid, order).await {
        Ok(order) => order,
        Err(error) => {
            observe_checkout(payment_method.as_str(), "rejected");

            return Err(into_status_error(error));
        }
    };

    observe_checkout(payment_method.as_str(), "placed");

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
