//! Test Helpers

use jiff::Timestamp;

use crate::domain::{
    addresses::{data::NewAddress, records::AddressUuid},
    coupons::{
        data::NewCoupon,
        records::{Applicability, Audience, CouponUuid, DiscountType},
    },
    orders::{
        pricing::OrderTotals,
        records::{OrderRecord, OrderUuid},
        status::{OrderStatus, PaymentMethod, PaymentStatus},
    },
    products::{
        data::NewProduct,
        records::{ProductRecord, ProductUuid},
    },
    users::records::UserUuid,
};

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

pub(crate) fn new_address() -> NewAddress {
    NewAddress {
        uuid: AddressUuid::new(),
        recipient: "Asha Rao".to_string(),
        phone: "+91 98450 00000".to_string(),
        line1: "12 MG Road".to_string(),
        line2: None,
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        postal_code: "560001".to_string(),
        country: "IN".to_string(),
    }
}

pub(crate) fn new_product(name: &str, price: u64, stock: u32) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        slug: slug(name),
        image_url: None,
        category: None,
        brand: None,
        price,
        stock,
        is_active: true,
    }
}

pub(crate) fn product_record(name: &str) -> ProductRecord {
    let now = Timestamp::now();

    ProductRecord {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        slug: slug(name),
        image_url: None,
        category: None,
        brand: None,
        price: 10_00,
        stock: 1,
        is_active: true,
        variants: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn new_coupon(code: &str, discount_type: DiscountType, value: u64) -> NewCoupon {
    NewCoupon {
        uuid: CouponUuid::new(),
        code: code.to_string(),
        description: None,
        discount_type,
        discount_value: value,
        max_discount: None,
        min_order_value: None,
        max_order_value: None,
        starts_at: None,
        expires_at: None,
        usage_limit: None,
        per_user_limit: None,
        audience: Audience::default(),
        applicability: Applicability::default(),
    }
}

/// A pending, unpaid gateway order with no lines.
pub(crate) fn order_record() -> OrderRecord {
    let now = Timestamp::now();

    OrderRecord {
        uuid: OrderUuid::new(),
        order_number: "ORD-20260301-0000ABCD".to_string(),
        user_uuid: UserUuid::new(),
        shipping_address_uuid: AddressUuid::new(),
        billing_address_uuid: AddressUuid::new(),
        payment_method: PaymentMethod::Gateway,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Pending,
        totals: OrderTotals::default(),
        coupon_uuid: None,
        coupon_code: None,
        gateway_order_id: None,
        gateway_payment_id: None,
        notes: None,
        cancellation_reason: None,
        items: Vec::new(),
        paid_at: None,
        delivered_at: None,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
    }
}
