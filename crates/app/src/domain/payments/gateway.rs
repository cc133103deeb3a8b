//! Payment gateway HTTP client.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection details for the payment gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway API base, e.g. `"https://api.razorpay.com"`.
    pub base_url: String,

    pub key_id: String,
    pub key_secret: String,

    /// ISO currency code sent with every order, e.g. `"INR"`.
    pub currency: String,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("key_secret", &"**redacted**")
            .field("currency", &self.currency)
            .finish()
    }
}

/// An order created on the gateway side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway order for `amount` minor units, tagged with `receipt`.
    async fn create_remote_order(
        &self,
        amount: u64,
        receipt: &str,
    ) -> Result<RemoteOrder, GatewayError>;
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: bool,
}

/// [`PaymentGateway`] over the gateway's REST API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    config: GatewayConfig,
    http: Client,
}

impl HttpPaymentGateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[tracing::instrument(
        name = "payments.gateway.create_remote_order",
        skip(self),
        fields(currency = %self.config.currency),
        err
    )]
    async fn create_remote_order(
        &self,
        amount: u64,
        receipt: &str,
    ) -> Result<RemoteOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&CreateOrderRequest {
                amount,
                currency: &self.config.currency,
                receipt,
                payment_capture: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GatewayError::UnexpectedResponse(format!(
                "order request failed with status {status}: {text}"
            )));
        }

        Ok(response.json::<RemoteOrder>().await?)
    }
}

/// Errors talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport or body decoding failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("unexpected response from payment gateway: {0}")]
    UnexpectedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_debug_hides_secret() {
        let config = GatewayConfig {
            base_url: "https://gateway.example.com".to_string(),
            key_id: "rzp_test_key".to_string(),
            key_secret: "very-secret".to_string(),
            currency: "INR".to_string(),
        };

        let debug = format!("{config:?}");

        assert!(debug.contains("rzp_test_key"), "key id should be visible");
        assert!(!debug.contains("very-secret"), "secret must not be printed");
    }

    #[test]
    fn create_order_body_uses_gateway_field_names() -> Result<(), serde_json::Error> {
        let body = serde_json::to_value(CreateOrderRequest {
            amount: 1_062_00,
            currency: "INR",
            receipt: "ORD-20260301-0000ABCD",
            payment_capture: true,
        })?;

        assert_eq!(
            body,
            serde_json::json!({
                "amount": 106_200,
                "currency": "INR",
                "receipt": "ORD-20260301-0000ABCD",
                "payment_capture": true,
            })
        );

        Ok(())
    }
}
