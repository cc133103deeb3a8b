//! Coupon Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// How a coupon's value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    /// Whole percent of the eligible subtotal.
    Percentage,

    /// Flat amount in minor units.
    Fixed,
}

impl DiscountType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown discount type: {0}")]
pub struct UnknownDiscountType(String);

impl FromStr for DiscountType {
    type Err = UnknownDiscountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownDiscountType(other.to_string())),
        }
    }
}

/// Which cart lines a coupon may discount. Empty lists do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applicability {
    pub include_products: Vec<ProductUuid>,
    pub exclude_products: Vec<ProductUuid>,
    pub include_categories: Vec<String>,
    pub exclude_categories: Vec<String>,
    pub include_brands: Vec<String>,
    pub exclude_brands: Vec<String>,
}

/// Which shoppers may use a coupon, based on their order history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Audience {
    pub new_users_only: bool,
    pub existing_users_only: bool,
    pub first_order_only: bool,
    pub min_previous_orders: Option<u32>,
}

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
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
    pub used_count: u32,
    pub per_user_limit: Option<u32>,
    pub audience: Audience,
    pub applicability: Applicability,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_type_parses_its_own_names() {
        for discount_type in [DiscountType::Percentage, DiscountType::Fixed] {
            assert_eq!(discount_type.as_str().parse::<DiscountType>().ok(), Some(discount_type));
        }
    }

    #[test]
    fn unknown_discount_type_is_rejected() {
        assert!("bogo".parse::<DiscountType>().is_err());
    }
}
