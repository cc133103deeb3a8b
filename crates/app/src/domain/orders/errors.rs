//! Orders service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{database::{Violation, violation}, domain::orders::status::OrderStatus};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("address not found")]
    InvalidAddress,

    #[error("cart is empty")]
    EmptyCart,

    #[error("cart failed validation")]
    CartInvalid(Vec<String>),

    #[error("coupon not found")]
    CouponNotFound,

    #[error("{0}")]
    CouponRejected(String),

    #[error("not enough stock left for {name}")]
    OutOfStock { name: String },

    #[error("order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order must be paid before it can be confirmed")]
    AwaitingPayment,

    #[error("order cannot be cancelled at this stage")]
    NotCancellable,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        match violation(&error) {
            Some(Violation::NoRows) => Self::NotFound,
            Some(Violation::Unique) => Self::AlreadyExists,
            Some(Violation::ForeignKey) => Self::InvalidReference,
            Some(Violation::NotNull) => Self::MissingRequiredData,
            Some(Violation::Check) => Self::InvalidData,
            None => Self::Sql(error),
        }
    }
}
