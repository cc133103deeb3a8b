//! Remove From Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State, wishlist::errors::into_status_error};

/// Remove From Wishlist Handler
#[endpoint(
    tags("wishlist"),
    summary = "Remove From Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Product removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Product is not in the wishlist"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    state
        .app
        .wishlist
        .remove_from_wishlist(user.uuid, product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
