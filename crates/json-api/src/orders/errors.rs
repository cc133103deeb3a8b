//! Order and Payment Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::{orders::OrdersServiceError, payments::PaymentsServiceError};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidAddress => {
            StatusError::unprocessable_entity().brief("Shipping or billing address not found")
        }
        OrdersServiceError::EmptyCart => StatusError::unprocessable_entity().brief("Cart is empty"),
        OrdersServiceError::CartInvalid(errors) => {
            StatusError::unprocessable_entity().brief(errors.join("; "))
        }
        OrdersServiceError::CouponNotFound => StatusError::not_found().brief("Coupon not found"),
        OrdersServiceError::CouponRejected(reason) => {
            StatusError::unprocessable_entity().brief(reason)
        }
        error @ (OrdersServiceError::OutOfStock { .. }
        | OrdersServiceError::InvalidTransition { .. }
        | OrdersServiceError::AwaitingPayment
        | OrdersServiceError::NotCancellable) => StatusError::conflict().brief(error.to_string()),
        OrdersServiceError::AlreadyExists
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn payment_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        error @ (PaymentsServiceError::InvalidSignature
        | PaymentsServiceError::GatewayOrderMismatch) => {
            StatusError::bad_request().brief(error.to_string())
        }
        error @ (PaymentsServiceError::OrderCancelled | PaymentsServiceError::NotPayable) => {
            StatusError::conflict().brief(error.to_string())
        }
        PaymentsServiceError::Gateway(source) => {
            error!("payment gateway error: {source}");

            StatusError::bad_gateway().brief("Payment gateway is unavailable")
        }
        PaymentsServiceError::AlreadyExists
        | PaymentsServiceError::InvalidReference
        | PaymentsServiceError::MissingRequiredData
        | PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::Sql(source) => {
            error!("payments storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
