//! Payment Models

/// What the client checkout widget needs to collect a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub gateway_order_id: String,

    /// Minor currency units.
    pub amount: u64,

    pub currency: String,

    /// Public key id the widget authenticates with.
    pub key_id: String,
}

/// Callback data returned by the checkout widget after payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,

    /// Hex HMAC-SHA256 over `gateway_order_id|gateway_payment_id`.
    pub signature: String,
}

impl PaymentConfirmation {
    /// The bytes the gateway signs.
    pub fn signed_payload(&self) -> String {
        format!("{}|{}", self.gateway_order_id, self.gateway_payment_id)
    }
}
