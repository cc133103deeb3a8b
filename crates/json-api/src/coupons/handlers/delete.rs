//! Deactivate Coupon Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

/// Deactivate Coupon Handler
///
/// The coupon is kept for order history but can no longer be applied.
#[endpoint(
    tags("admin"),
    summary = "Deactivate Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Coupon deactivated"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
    ),
)]
pub(crate) async fn handler(
    coupon: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .coupons
        .deactivate_coupon(coupon.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
