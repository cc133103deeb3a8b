//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{database::{Violation, violation}, auth::ApiTokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// No active token matches, or its secret does not verify.
    #[error("token not found")]
    NotFound,

    /// The bearer value is not shaped like one of our tokens.
    #[error("malformed api token")]
    Token(#[source] ApiTokenError),

    /// A token was issued for a user that does not exist.
    #[error("user not found")]
    UnknownUser,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        match violation(&error) {
            Some(Violation::ForeignKey) => Self::UnknownUser,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
