//! Order Event Models

use crate::domain::{
    orders::{
        records::{OrderRecord, OrderUuid},
        status::OrderStatus,
    },
    users::records::UserUuid,
};

/// An order changed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub order_uuid: OrderUuid,
    pub order_number: String,

    /// Shopper who owns the order.
    pub user_uuid: UserUuid,

    /// `None` when the order was just placed.
    pub old_status: Option<OrderStatus>,

    pub new_status: OrderStatus,

    /// Who made the change; `None` for system transitions.
    pub actor_uuid: Option<UserUuid>,

    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl OrderEvent {
    /// Event for `order` having just entered its current status.
    pub fn transition(order: &OrderRecord, old_status: Option<OrderStatus>) -> Self {
        Self {
            order_uuid: order.uuid,
            order_number: order.order_number.clone(),
            user_uuid: order.user_uuid,
            old_status,
            new_status: order.status,
            actor_uuid: None,
            reason: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn by(mut self, actor: Option<UserUuid>) -> Self {
        self.actor_uuid = actor;
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}
