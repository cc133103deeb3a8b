//! Coupon Data

use jiff::Timestamp;

use crate::domain::coupons::records::{Applicability, Audience, CouponUuid, DiscountType};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: u64,
    pub max_discount: Option<u64>,
    pub min_order_value: Option<u64>,
    pub max_order_value: Option<u64>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub usage_limit: Option<u32>,
    pub per_user_limit: Option<u32>,
    pub audience: Audience,
    pub applicability: Applicability,
}
