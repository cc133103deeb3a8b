//! Status history recorder.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{PgPool, query};

use crate::domain::{
    events::OrderEvent,
    orders::{records::StatusHistoryUuid, status::OrderStatus},
    users::records::UserUuid,
};

const CREATE_STATUS_HISTORY_SQL: &str = include_str!("sql/create_status_history.sql");

/// Appends one audit record per order status transition.
#[automock]
#[async_trait]
pub trait StatusHistoryRecorder: Send + Sync {
    async fn record(&self, event: &OrderEvent) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgStatusHistoryRecorder {
    pool: PgPool,
}

impl PgStatusHistoryRecorder {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusHistoryRecorder for PgStatusHistoryRecorder {
    async fn record(&self, event: &OrderEvent) -> Result<(), sqlx::Error> {
        query(CREATE_STATUS_HISTORY_SQL)
            .bind(StatusHistoryUuid::new().into_uuid())
            .bind(event.order_uuid.into_uuid())
            .bind(event.old_status.map(OrderStatus::as_str))
            .bind(event.new_status.as_str())
            .bind(event.actor_uuid.map(UserUuid::into_uuid))
            .bind(event.reason.as_deref())
            .bind(event.notes.as_deref())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
