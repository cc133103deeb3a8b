//! Order totals.

/// Flat GST rate, in percent.
pub const TAX_PERCENT: u64 = 18;

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: u64 = 500_00;

/// Shipping charged at or below the free shipping threshold.
pub const SHIPPING_FEE: u64 = 50_00;

/// Monetary breakdown of an order, in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: u64,
    pub discount: u64,
    pub tax: u64,
    pub shipping: u64,
    pub total: u64,
}

/// Tax on `taxable`, rounded half up to the nearest minor unit.
pub fn tax_on(taxable: u64) -> u64 {
    let tax = (u128::from(taxable) * u128::from(TAX_PERCENT) + 50) / 100;

    u64::try_from(tax).unwrap_or(u64::MAX)
}

pub fn shipping_for(subtotal: u64) -> u64 {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        0
    } else {
        SHIPPING_FEE
    }
}

/// Price an order. `discount` is clamped to the subtotal.
pub fn compute_totals(subtotal: u64, discount: u64) -> OrderTotals {
    let discount = discount.min(subtotal);
    let taxable = subtotal - discount;
    let tax = tax_on(taxable);
    let shipping = shipping_for(subtotal);

    OrderTotals {
        subtotal,
        discount,
        tax,
        shipping,
        total: taxable.saturating_add(tax).saturating_add(shipping),
    }
}
