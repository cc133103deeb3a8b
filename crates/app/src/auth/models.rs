//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    auth::ApiTokenVersion,
    domain::users::records::{Role, UserUuid},
};

/// An unrevoked, unexpired token row joined to its owner.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    pub user_uuid: UserUuid,

    /// Read from the users table, so a demoted admin loses access at once.
    pub role: Role,

    pub version: ApiTokenVersion,

    /// Hex HMAC of [`crate::auth::ApiToken::verifier_input`].
    pub token_hash: String,
}

/// What the CLI can show about a token. Never includes the secret.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// Row to insert when issuing a token.
#[derive(Debug, Clone)]
pub struct NewApiToken {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

/// Returned once at issue time. `token` is the only copy of the secret.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
