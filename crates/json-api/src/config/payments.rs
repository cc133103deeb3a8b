//! Payments Config

use clap::Args;

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment gateway API base URL
    #[arg(
        long,
        env = "PAYMENT_GATEWAY_BASE_URL",
        default_value = "https://api.razorpay.com"
    )]
    pub gateway_base_url: String,

    /// Public key id handed to checkout clients
    #[arg(long, env = "PAYMENT_GATEWAY_KEY_ID")]
    pub gateway_key_id: String,

    /// Key secret used to authenticate against the gateway
    #[arg(long, env = "PAYMENT_GATEWAY_KEY_SECRET", hide_env_values = true)]
    pub gateway_key_secret: String,

    /// Secret the gateway signs payment callbacks with
    #[arg(long, env = "PAYMENT_SIGNATURE_SECRET", hide_env_values = true)]
    pub payment_signature_secret: String,

    /// ISO currency code for gateway orders
    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "INR")]
    pub currency: String,
}
