//! Update Order Status Handler

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

use storefront_app::domain::orders::{data::StatusUpdate, status::OrderStatus};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest {
    /// Target status, e.g. `processing` or `shipped`
    pub status: String,

    /// Kept in the status history. Used as the reason when cancelling.
    pub notes: Option<String>,
}

/// Update Order Status Handler
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let request = json.into_inner();

    let status = request
        .status
        .parse::<OrderStatus>()
        .or_400("unknown order status")?;

    let order = state
        .app
        .orders
        .update_status(
            order.into_inner().into(),
            StatusUpdate {
                status,
                actor: user.uuid,
                notes: request.notes,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
