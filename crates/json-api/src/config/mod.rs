//! Server configuration module

use clap::Parser;

use storefront_app::{context::AppSettings, domain::payments::gateway::GatewayConfig};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

pub(crate) use observability::LogFormat;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// API token settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings the application services are built from.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            pool: self.database.pool_settings(),
            token_pepper: self.auth.token_pepper.clone(),
            gateway: GatewayConfig {
                base_url: self.payments.gateway_base_url.clone(),
                key_id: self.payments.gateway_key_id.clone(),
                key_secret: self.payments.gateway_key_secret.clone(),
                currency: self.payments.currency.clone(),
            },
            payment_signature_secret: self.payments.payment_signature_secret.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "storefront-json",
        "--database-url",
        "postgres://localhost/storefront",
        "--token-pepper",
        "pepper",
        "--gateway-key-id",
        "rzp_test_key",
        "--gateway-key-secret",
        "gateway-secret",
    ];

    #[test]
    fn defaults_fill_optional_settings() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--payment-signature-secret", "signature-secret"]),
        )?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.server.shutdown_grace().as_secs(), 30);
        assert_eq!(config.app_settings().pool.max_connections, 10);
        assert_eq!(config.payments.currency, "INR");
        assert_eq!(
            config.payments.gateway_base_url,
            "https://api.razorpay.com"
        );

        Ok(())
    }

    #[test]
    fn app_settings_carry_secrets_through() -> TestResult {
        let config = ServerConfig::try_parse_from(
            REQUIRED
                .into_iter()
                .chain(["--payment-signature-secret", "signature-secret"]),
        )?;

        let settings = config.app_settings();

        assert_eq!(settings.token_pepper, "pepper");
        assert_eq!(settings.payment_signature_secret, "signature-secret");
        assert_eq!(settings.gateway.key_id, "rzp_test_key");
        assert_eq!(settings.gateway.key_secret, "gateway-secret");

        Ok(())
    }

    #[test]
    fn zero_pool_size_is_raised_to_one() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED.into_iter().chain([
            "--payment-signature-secret",
            "signature-secret",
            "--database-max-connections",
            "0",
        ]))?;

        assert_eq!(config.app_settings().pool.max_connections, 1);

        Ok(())
    }

    #[test]
    fn missing_signature_secret_is_rejected() {
        let result = ServerConfig::try_parse_from(REQUIRED);

        assert!(result.is_err(), "signature secret should be required");
    }
}
