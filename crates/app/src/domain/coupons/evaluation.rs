//! Coupon eligibility and discount arithmetic.
//!
//! Everything here is pure: callers gather the coupon, cart lines and the
//! shopper's history, and get back a decision plus the discount in minor units.

use jiff::Timestamp;

use crate::domain::{
    carts::records::CartItemRecord,
    coupons::records::{Applicability, CouponRecord, DiscountType},
    products::records::ProductUuid,
};

pub const NOT_VALID: &str = "Coupon is not valid";
pub const USAGE_LIMIT_REACHED: &str = "Coupon usage limit reached";
pub const ALREADY_USED: &str = "You have already used this coupon";
pub const NOT_APPLICABLE: &str = "Coupon is not applicable to items in your cart";

/// What the evaluator needs to know about the shopper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShopperHistory {
    /// Orders placed before this one, excluding cancelled orders.
    pub order_count: u64,

    /// Times this shopper has already redeemed the coupon.
    pub redemptions: u64,
}

/// Outcome of checking a coupon against a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponCheck {
    pub can_apply: bool,
    pub reason: Option<String>,
}

impl CouponCheck {
    fn applicable() -> Self {
        Self {
            can_apply: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            can_apply: false,
            reason: Some(reason.into()),
        }
    }
}

/// A coupon checked against a whole cart, with the discount it would give.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponEvaluation {
    pub check: CouponCheck,

    /// Zero whenever the coupon cannot be applied.
    pub discount: u64,
}

/// One cart line as seen by the applicability filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibleLine<'a> {
    pub product: ProductUuid,
    pub category: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub line_total: u64,
}

impl<'a> From<&'a CartItemRecord> for EligibleLine<'a> {
    fn from(item: &'a CartItemRecord) -> Self {
        Self {
            product: item.product_uuid,
            category: item.category.as_deref(),
            brand: item.brand.as_deref(),
            line_total: item.line_total(),
        }
    }
}

fn format_amount(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}

fn is_live(coupon: &CouponRecord, now: Timestamp) -> bool {
    coupon.is_active
        && coupon.starts_at.is_none_or(|starts_at| starts_at <= now)
        && coupon.expires_at.is_none_or(|expires_at| now < expires_at)
}

/// Decide whether `coupon` may be used on a cart worth `cart_total`.
///
/// Applicability filters are not considered here; see [`eligible_subtotal`].
pub fn can_apply_to_cart(
    coupon: &CouponRecord,
    cart_total: u64,
    history: ShopperHistory,
    now: Timestamp,
) -> CouponCheck {
    if !is_live(coupon, now) {
        return CouponCheck::rejected(NOT_VALID);
    }

    if coupon
        .usage_limit
        .is_some_and(|limit| coupon.used_count >= limit)
    {
        return CouponCheck::rejected(USAGE_LIMIT_REACHED);
    }

    if coupon
        .per_user_limit
        .is_some_and(|limit| history.redemptions >= u64::from(limit))
    {
        return CouponCheck::rejected(ALREADY_USED);
    }

    if let Some(min) = coupon.min_order_value
        && cart_total < min
    {
        return CouponCheck::rejected(format!(
            "Minimum order value of {} required",
            format_amount(min)
        ));
    }

    if let Some(max) = coupon.max_order_value
        && cart_total > max
    {
        return CouponCheck::rejected(format!(
            "Coupon is valid only for orders up to {}",
            format_amount(max)
        ));
    }

    let audience = coupon.audience;

    if audience.new_users_only && history.order_count > 0 {
        return CouponCheck::rejected("Coupon is only valid for new customers");
    }

    if audience.existing_users_only && history.order_count == 0 {
        return CouponCheck::rejected("Coupon is only valid for returning customers");
    }

    if audience.first_order_only && history.order_count > 0 {
        return CouponCheck::rejected("Coupon is only valid on your first order");
    }

    if let Some(min_orders) = audience.min_previous_orders
        && history.order_count < u64::from(min_orders)
    {
        return CouponCheck::rejected(format!(
            "Coupon requires at least {min_orders} previous orders"
        ));
    }

    CouponCheck::applicable()
}

fn allowed<T: PartialEq>(value: Option<&T>, include: &[T], exclude: &[T]) -> bool {
    let included = include.is_empty() || value.is_some_and(|value| include.contains(value));
    let excluded = value.is_some_and(|value| exclude.contains(value));

    included && !excluded
}

fn line_is_eligible(filters: &Applicability, line: &EligibleLine<'_>) -> bool {
    let category = line.category.map(ToString::to_string);
    let brand = line.brand.map(ToString::to_string);

    allowed(
        Some(&line.product),
        &filters.include_products,
        &filters.exclude_products,
    ) && allowed(
        category.as_ref(),
        &filters.include_categories,
        &filters.exclude_categories,
    ) && allowed(
        brand.as_ref(),
        &filters.include_brands,
        &filters.exclude_brands,
    )
}

/// Sum of the line totals the coupon's filters allow it to discount.
pub fn eligible_subtotal<'a>(
    filters: &Applicability,
    lines: impl IntoIterator<Item = EligibleLine<'a>>,
) -> u64 {
    lines
        .into_iter()
        .filter(|line| line_is_eligible(filters, line))
        .map(|line| line.line_total)
        .fold(0, u64::saturating_add)
}

/// Discount `coupon` gives on `amount`, always within `[0, amount]`.
///
/// Percentages round half up to the nearest minor unit.
pub fn calculate_discount(coupon: &CouponRecord, amount: u64) -> u64 {
    let raw = match coupon.discount_type {
        DiscountType::Percentage => {
            let scaled = u128::from(amount) * u128::from(coupon.discount_value);
            let rounded = (scaled + 50) / 100;

            let discount = u64::try_from(rounded).unwrap_or(u64::MAX);

            coupon
                .max_discount
                .map_or(discount, |cap| discount.min(cap))
        }
        DiscountType::Fixed => coupon.discount_value,
    };

    raw.min(amount)
}

/// Full evaluation of a coupon against cart lines.
pub fn evaluate<'a>(
    coupon: &CouponRecord,
    lines: impl IntoIterator<Item = EligibleLine<'a>>,
    history: ShopperHistory,
    now: Timestamp,
) -> CouponEvaluation {
    let lines: Vec<EligibleLine<'a>> = lines.into_iter().collect();

    let cart_total = lines
        .iter()
        .map(|line| line.line_total)
        .fold(0, u64::saturating_add);

    let check = can_apply_to_cart(coupon, cart_total, history, now);

    if !check.can_apply {
        return CouponEvaluation { check, discount: 0 };
    }

    let eligible = eligible_subtotal(&coupon.applicability, lines);

    if eligible == 0 {
        return CouponEvaluation {
            check: CouponCheck::rejected(NOT_APPLICABLE),
            discount: 0,
        };
    }

    CouponEvaluation {
        check,
        discount: calculate_discount(coupon, eligible),
    }
}
