//! Order Data

use crate::domain::{
    addresses::records::AddressUuid,
    orders::status::{OrderStatus, PaymentMethod},
    users::records::UserUuid,
};

/// Checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub shipping_address: AddressUuid,

    /// Defaults to the shipping address.
    pub billing_address: Option<AddressUuid>,

    pub payment_method: PaymentMethod,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
}

/// Back-office status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub actor: UserUuid,
    pub notes: Option<String>,
}
