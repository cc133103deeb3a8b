//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Cart item not found"),
        CartsServiceError::ProductUnavailable => {
            StatusError::unprocessable_entity().brief("Product is not available")
        }
        CartsServiceError::InsufficientStock { available } => StatusError::conflict()
            .brief(format!("Only {available} units are available")),
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be positive")
        }
        CartsServiceError::AlreadyExists
        | CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("carts storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
