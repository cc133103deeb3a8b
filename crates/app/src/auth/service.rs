//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        ApiToken, ApiTokenMetadata, AuthServiceError, IssuedApiToken, NewApiToken,
        repository::PgAuthRepository,
    },
    domain::users::records::{CurrentUser, UserUuid},
    signing::HmacSigner,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    signer: HmacSigner,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, signer: HmacSigner) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            signer,
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insertion fails.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token = ApiToken::generate();

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token.uuid(),
                user_uuid: user,
                version: token.version(),
                token_hash: self.signer.sign(&token.verifier_input(user)),
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken {
            token: token.to_string(),
            metadata,
        })
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(name = "auth.service.authenticate_bearer", skip_all, err)]
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CurrentUser, AuthServiceError> {
        let presented: ApiToken = bearer_token.parse()?;

        let stored = self
            .repository
            .find_active_api_token_by_uuid(presented.uuid(), presented.version())
            .await?
            .filter(|stored| stored.version == presented.version())
            .ok_or(AuthServiceError::NotFound)?;

        let verifier_input = presented.verifier_input(stored.user_uuid);

        if !self.signer.verify(&verifier_input, &stored.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // A failed last-used stamp does not fail the request.
        if let Err(source) = self
            .repository
            .touch_api_token_last_used(presented.uuid())
            .await
        {
            warn!(token = %presented.uuid(), "could not record token use: {source}");
        }

        Ok(CurrentUser {
            uuid: stored.user_uuid,
            role: stored.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CurrentUser, AuthServiceError>;
}
