//! Bearer tokens.
//!
//! A token reads `sf_v{version}_{uuid}.{secret}` where the uuid is the
//! simple (dashless) form and the secret is 32 random bytes in lowercase hex.
//! Only an HMAC of [`ApiToken::verifier_input`] is ever stored.

use std::{fmt, str::FromStr};

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::users::records::UserUuid;

const PREFIX: &str = "sf";

const SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// Layout revision, stored alongside the hash so old tokens stay verifiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    pub const CURRENT: Self = Self::V1;

    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Clone)]
struct Secret([u8; SECRET_LEN]);

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A bearer token held in memory. The secret is wiped on drop and never
/// appears in `Debug` output.
#[derive(Clone)]
pub struct ApiToken {
    uuid: Uuid,
    version: ApiTokenVersion,
    secret: Secret,
}

impl ApiToken {
    /// A fresh token at the current version with an OS-random secret.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; SECRET_LEN];

        OsRng.fill_bytes(&mut bytes);

        Self {
            uuid: Uuid::now_v7(),
            version: ApiTokenVersion::CURRENT,
            secret: Secret(bytes),
        }
    }

    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    #[must_use]
    pub const fn version(&self) -> ApiTokenVersion {
        self.version
    }

    /// Bytes fed to the HMAC. Binding the owner means a stored hash cannot be
    /// replayed against another user's row.
    #[must_use]
    pub fn verifier_input(&self, owner: UserUuid) -> Vec<u8> {
        format!(
            "{}:{}:{}:{}",
            self.uuid.simple(),
            self.version.as_i16(),
            owner.into_uuid().simple(),
            hex::encode(self.secret.0),
        )
        .into_bytes()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("uuid", &self.uuid)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}_v{}_{}.{}",
            self.version.as_i16(),
            self.uuid.simple(),
            hex::encode(self.secret.0)
        )
    }
}

impl FromStr for ApiToken {
    type Err = ApiTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (head, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

        let rest = head
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_prefix("_v"))
            .ok_or(ApiTokenError::InvalidFormat)?;

        let (version, uuid) = rest.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

        let version = version
            .parse::<i16>()
            .map_err(|_ignored| ApiTokenError::UnsupportedVersion)
            .and_then(ApiTokenVersion::try_from)?;

        let uuid = Uuid::try_parse(uuid).map_err(|_ignored| ApiTokenError::InvalidFormat)?;

        let mut secret = Secret([0_u8; SECRET_LEN]);

        hex::decode_to_slice(secret_hex, &mut secret.0)
            .map_err(|_ignored| ApiTokenError::InvalidSecretEncoding)?;

        Ok(Self {
            uuid,
            version,
            secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const ZERO_UUID: &str = "00000000000000000000000000000000";

    #[test]
    fn generated_token_survives_its_own_display() -> TestResult {
        let token = ApiToken::generate();
        let parsed: ApiToken = token.to_string().parse()?;

        assert_eq!(parsed.uuid(), token.uuid());
        assert_eq!(parsed.version(), ApiTokenVersion::V1);
        assert_eq!(parsed.secret.0, token.secret.0);

        Ok(())
    }

    #[test]
    fn display_uses_storefront_prefix() {
        let token = ApiToken::generate();

        assert!(token.to_string().starts_with("sf_v1_"));
    }

    #[test]
    fn debug_hides_secret() {
        let token = ApiToken::generate();
        let debug = format!("{token:?}");

        assert!(!debug.contains(&hex::encode(token.secret.0)));
    }

    #[test]
    fn foreign_prefix_is_rejected() {
        let result = format!("tok_v1_{ZERO_UUID}.aa").parse::<ApiToken>();

        assert!(matches!(result, Err(ApiTokenError::InvalidFormat)));
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = format!("sf_v1_{ZERO_UUID}.abcd").parse::<ApiToken>();

        assert!(
            matches!(result, Err(ApiTokenError::InvalidSecretEncoding)),
            "expected InvalidSecretEncoding, got {result:?}"
        );
    }

    #[test]
    fn unknown_version_is_rejected() {
        let secret = hex::encode([0_u8; SECRET_LEN]);
        let result = format!("sf_v9_{ZERO_UUID}.{secret}").parse::<ApiToken>();

        assert!(
            matches!(result, Err(ApiTokenError::UnsupportedVersion)),
            "expected UnsupportedVersion, got {result:?}"
        );
    }

    #[test]
    fn verifier_input_differs_per_owner() {
        let token = ApiToken::generate();

        assert_ne!(
            token.verifier_input(UserUuid::from_uuid(Uuid::nil())),
            token.verifier_input(UserUuid::from_uuid(Uuid::max())),
        );
    }
}
