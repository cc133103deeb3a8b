//! Cancel Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Cancel Order Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelOrderRequest {
    pub reason: Option<String>,
}

/// Cancel Order Handler
///
/// Only pending and confirmed orders can be cancelled. Reserved stock is released.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order can no longer be cancelled"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<CancelOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let order = state
        .app
        .orders
        .cancel_order(user.uuid, order.into_inner().into(), json.into_inner().reason)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService, OrdersServiceError, records::OrderUuid, status::OrderStatus,
    };

    use crate::test_helpers::{TEST_CUSTOMER, app_context, customer_service, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let mut app = app_context();

        app.orders = Arc::new(orders);

        customer_service(app, Router::with_path("orders/{order}/cancel").post(handler))
    }

    #[tokio::test]
    async fn test_cancel_passes_reason_through() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .withf(move |user, u, reason| {
                *user == TEST_CUSTOMER.uuid
                    && *u == uuid
                    && reason.as_deref() == Some("Ordered the wrong size")
            })
            .return_once(move |_, _, reason| {
                let mut order = make_order(uuid);

                order.status = OrderStatus::Cancelled;
                order.cancellation_reason = reason;
                order.cancelled_at = Some(Timestamp::UNIX_EPOCH);

                Ok(order)
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/cancel"))
            .json(&json!({ "reason": "Ordered the wrong size" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.status, "cancelled");
        assert_eq!(body.cancellation_reason.as_deref(), Some("Ordered the wrong size"));
        assert!(body.cancelled_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_shipped_order_cannot_be_cancelled() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_cancel_order()
            .once()
            .return_once(|_, _, _| Err(OrdersServiceError::NotCancellable));

        let res = TestClient::post(format!("http://example.com/orders/{}/cancel", OrderUuid::new()))
            .json(&json!({}))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
