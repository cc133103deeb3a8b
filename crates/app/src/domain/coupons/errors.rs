//! Coupons service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::{Violation, violation};

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("coupon already exists")]
    AlreadyExists,

    #[error("coupon not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CouponsServiceError {
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
