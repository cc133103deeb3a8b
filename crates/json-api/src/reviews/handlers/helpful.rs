//! Mark Review Helpful Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    reviews::{errors::into_status_error, index::ReviewResponse},
    state::State,
};

/// Mark Review Helpful Handler
#[endpoint(
    tags("reviews"),
    summary = "Mark Review Helpful",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Helpful count incremented"),
        (status_code = StatusCode::NOT_FOUND, description = "Review not found"),
    ),
)]
pub(crate) async fn handler(
    review: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let review = state
        .app
        .reviews
        .mark_helpful(review.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(review.into()))
}
