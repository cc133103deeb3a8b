//! Payments service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{database::{Violation, violation}, domain::payments::gateway::GatewayError};

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment already recorded")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("payment signature does not match")]
    InvalidSignature,

    #[error("payment does not belong to this order")]
    GatewayOrderMismatch,

    #[error("order has been cancelled")]
    OrderCancelled,

    #[error("order is not awaiting online payment")]
    NotPayable,

    #[error("payment gateway request failed")]
    Gateway(#[source] GatewayError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<GatewayError> for PaymentsServiceError {
    fn from(error: GatewayError) -> Self {
        Self::Gateway(error)
    }
}

impl From<Error> for PaymentsServiceError {
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
