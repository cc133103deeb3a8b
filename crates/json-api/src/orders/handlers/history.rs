//! Order History Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::StatusHistoryRecord;

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusChangeResponse {
    /// Absent on the entry written when the order was placed
    pub old_status: Option<String>,

    pub new_status: String,

    /// Staff member who made the change, if any
    pub actor_uuid: Option<Uuid>,

    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<StatusHistoryRecord> for StatusChangeResponse {
    fn from(change: StatusHistoryRecord) -> Self {
        StatusChangeResponse {
            old_status: change.old_status.map(|status| status.to_string()),
            new_status: change.new_status.to_string(),
            actor_uuid: change.actor_uuid.map(Into::into),
            reason: change.reason,
            notes: change.notes,
            created_at: change.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderHistoryResponse {
    pub history: Vec<StatusChangeResponse>,
}

/// Order History Handler
///
/// Status changes of one of the shopper's orders, oldest first.
#[endpoint(
    tags("orders"),
    summary = "Order Status History",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status history"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderHistoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let history = state
        .app
        .orders
        .get_history(user.uuid, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrderHistoryResponse {
        history: history.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService,
        records::{OrderUuid, StatusHistoryUuid},
        status::OrderStatus,
    };

    use crate::test_helpers::{TEST_ADMIN, app_context, customer_service};

    use super::*;

    #[tokio::test]
    async fn test_history_renders_transitions_in_order() -> TestResult {
        let uuid = OrderUuid::new();

        let history = vec![
            StatusHistoryRecord {
                uuid: StatusHistoryUuid::new(),
                order_uuid: uuid,
                old_status: None,
                new_status: OrderStatus::Pending,
                actor_uuid: None,
                reason: None,
                notes: None,
                created_at: Timestamp::UNIX_EPOCH,
            },
            StatusHistoryRecord {
                uuid: StatusHistoryUuid::new(),
                order_uuid: uuid,
                old_status: Some(OrderStatus::Pending),
                new_status: OrderStatus::Confirmed,
                actor_uuid: Some(TEST_ADMIN.uuid),
                reason: None,
                notes: Some("COD confirmed by phone".to_string()),
                created_at: Timestamp::UNIX_EPOCH,
            },
        ];

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_history()
            .once()
            .withf(move |_, u| *u == uuid)
            .return_once(move |_, _| Ok(history));

        let mut app = app_context();

        app.orders = Arc::new(orders);

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}/history"))
            .send(&customer_service(
                app,
                Router::with_path("orders/{order}/history").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderHistoryResponse = res.take_json().await?;
        let steps: Vec<_> = body
            .history
            .iter()
            .map(|change| (change.old_status.as_deref(), change.new_status.as_str()))
            .collect();

        assert_eq!(steps, [(None, "pending"), (Some("pending"), "confirmed")]);

        Ok(())
    }
}
