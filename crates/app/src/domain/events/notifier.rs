//! Shopper notifications.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::domain::events::OrderEvent;

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifierError(pub String);

/// Tells the shopper their order moved.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &OrderEvent) -> Result<(), NotifierError>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &OrderEvent) -> Result<(), NotifierError> {
        info!(
            order_number = %event.order_number,
            user_uuid = %event.user_uuid,
            status = %event.new_status,
            "order status notification"
        );

        Ok(())
    }
}
