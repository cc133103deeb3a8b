//! Report Review Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, reviews::errors::into_status_error, state::State};

/// Report Review Handler
///
/// Flags a review for moderation. The report count is not exposed to shoppers.
#[endpoint(
    tags("reviews"),
    summary = "Report Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Review reported"),
        (status_code = StatusCode::NOT_FOUND, description = "Review not found"),
    ),
)]
pub(crate) async fn handler(
    review: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .reviews
        .report(review.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
