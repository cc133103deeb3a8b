//! Verify Payment Handler

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

use storefront_app::domain::payments::models::PaymentConfirmation;

use crate::{
    extensions::*,
    observability::observe_payment_verification,
    orders::{errors::payment_status_error, get::OrderResponse},
    state::State,
};

/// The callback fields the checkout widget hands back after payment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,

    /// Hex HMAC-SHA256 of `gatewayOrderId|gatewayPaymentId`
    pub signature: String,
}

impl From<VerifyPaymentRequest> for PaymentConfirmation {
    fn from(request: VerifyPaymentRequest) -> Self {
        PaymentConfirmation {
            gateway_order_id: request.gateway_order_id,
            gateway_payment_id: request.gateway_payment_id,
            signature: request.signature,
        }
    }
}

/// Verify Payment Handler
///
/// A valid signature marks the order paid and confirmed.
#[endpoint(
    tags("payments"),
    summary = "Verify Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Signature or order mismatch"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order cannot be paid"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let order = state
        .app
        .payments
        .verify_payment(user.uuid, order.into_inner().into(), json.into_inner().into())
        .await
        .map_err(|error| {
            observe_payment_verification("rejected");

            payment_status_error(error)
        })?;

    observe_payment_verification("paid");

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::{
            records::OrderUuid,
            status::{OrderStatus, PaymentStatus},
        },
        payments::{MockPaymentsService, PaymentsServiceError},
    };

    use crate::test_helpers::{app_context, customer_service, make_order};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        let mut app = app_context();

        app.payments = Arc::new(payments);

        customer_service(
            app,
            Router::with_path("orders/{order}/payment/verify").post(handler),
        )
    }

    fn callback() -> serde_json::Value {
        json!({
            "gatewayOrderId": "order_9A33XWu170gUtm",
            "gatewayPaymentId": "pay_29QQoUBi66xm2f",
            "signature": "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d",
        })
    }

    #[tokio::test]
    async fn test_verified_payment_confirms_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_payment()
            .once()
            .withf(move |_, u, confirmation| {
                *u == uuid
                    && confirmation.signed_payload() == "order_9A33XWu170gUtm|pay_29QQoUBi66xm2f"
            })
            .return_once(move |_, _, confirmation| {
                let mut order = make_order(uuid);

                order.status = OrderStatus::Confirmed;
                order.payment_status = PaymentStatus::Paid;
                order.gateway_order_id = Some(confirmation.gateway_order_id);
                order.gateway_payment_id = Some(confirmation.gateway_payment_id);
                order.paid_at = Some(Timestamp::UNIX_EPOCH);

                Ok(order)
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/payment/verify"))
            .json(&callback())
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.status, "confirmed");
        assert_eq!(body.payment_status, "paid");
        assert!(body.paid_at.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_signature_returns_400() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_payment()
            .once()
            .return_once(|_, _, _| Err(PaymentsServiceError::InvalidSignature));

        let res = TestClient::post(format!(
            "http://example.com/orders/{}/payment/verify",
            OrderUuid::new()
        ))
        .json(&callback())
        .send(&make_service(payments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_cancelled_order_returns_409() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_payment()
            .once()
            .return_once(|_, _, _| Err(PaymentsServiceError::OrderCancelled));

        let res = TestClient::post(format!(
            "http://example.com/orders/{}/payment/verify",
            OrderUuid::new()
        ))
        .json(&callback())
        .send(&make_service(payments))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
