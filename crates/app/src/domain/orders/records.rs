//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{
        addresses::records::AddressUuid,
        coupons::records::CouponUuid,
        orders::{
            pricing::OrderTotals,
            status::{OrderStatus, PaymentMethod, PaymentStatus},
        },
        products::records::{ProductUuid, VariantUuid},
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub shipping_address_uuid: AddressUuid,
    pub billing_address_uuid: AddressUuid,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub totals: OrderTotals,
    pub coupon_uuid: Option<CouponUuid>,
    pub coupon_code: Option<String>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub items: Vec<OrderItemRecord>,
    pub paid_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order line as captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: Option<VariantUuid>,
    pub name: String,
    pub variant_name: Option<String>,
    pub image_url: Option<String>,
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

/// Status History UUID
pub type StatusHistoryUuid = TypedUuid<StatusHistoryRecord>;

/// One recorded order status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryRecord {
    pub uuid: StatusHistoryUuid,
    pub order_uuid: OrderUuid,

    /// `None` for the record written when the order is placed.
    pub old_status: Option<OrderStatus>,

    pub new_status: OrderStatus,
    pub actor_uuid: Option<UserUuid>,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}
