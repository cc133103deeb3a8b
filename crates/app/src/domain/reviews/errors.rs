//! Reviews service errors.

use sqlx::Error;
use thiserror::Error;

use crate::database::{Violation, violation};

#[derive(Debug, Error)]
pub enum ReviewsServiceError {
    #[error("product already reviewed")]
    AlreadyExists,

    #[error("review not found")]
    NotFound,

    #[error("rating must be between 1 and 5")]
    InvalidRating,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ReviewsServiceError {
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
