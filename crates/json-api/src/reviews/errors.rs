//! Review Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::reviews::ReviewsServiceError;

pub(crate) fn into_status_error(error: ReviewsServiceError) -> StatusError {
    match error {
        ReviewsServiceError::AlreadyExists => {
            StatusError::conflict().brief("You have already reviewed this product")
        }
        ReviewsServiceError::NotFound => StatusError::not_found().brief("Review not found"),
        ReviewsServiceError::InvalidReference => {
            StatusError::not_found().brief("Product not found")
        }
        ReviewsServiceError::InvalidRating => {
            StatusError::bad_request().brief("Rating must be between 1 and 5")
        }
        ReviewsServiceError::MissingRequiredData | ReviewsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid review payload")
        }
        ReviewsServiceError::Sql(source) => {
            error!("reviews storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
