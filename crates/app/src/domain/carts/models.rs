//! Cart Models

use std::fmt;

use crate::domain::{
    carts::records::{CartItemRecord, CartUuid},
    products::{
        models::Purchasable,
        records::{ProductUuid, VariantUuid},
    },
    users::records::UserUuid,
};

/// A shopper's cart with totals derived from its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    /// `None` for a shopper who has never stored a cart.
    pub uuid: Option<CartUuid>,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemRecord>,
}

impl Cart {
    /// Empty cart for a shopper with nothing persisted.
    pub fn empty(user: UserUuid) -> Self {
        Self {
            uuid: None,
            user_uuid: user,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .map(CartItemRecord::line_total)
            .fold(0, u64::saturating_add)
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.quantity)
            .fold(0, u32::saturating_add)
    }

    /// The line holding this (product, variant) pair, if any.
    pub fn find_line(
        &self,
        product: ProductUuid,
        variant: Option<VariantUuid>,
    ) -> Option<&CartItemRecord> {
        self.items
            .iter()
            .find(|item| item.product_uuid == product && item.variant_uuid == variant)
    }

    /// Quantity the pair would have after adding `quantity` more.
    pub fn merged_quantity(
        &self,
        product: ProductUuid,
        variant: Option<VariantUuid>,
        quantity: u32,
    ) -> u32 {
        self.find_line(product, variant)
            .map_or(quantity, |line| line.quantity.saturating_add(quantity))
    }
}

/// A problem found when re-checking a cart line against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    Unavailable { name: String },
    InsufficientStock { name: String, available: u32 },
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { name } => write!(f, "{name} is no longer available"),
            Self::InsufficientStock { name, available } => {
                write!(f, "Only {available} units of {name} are available")
            }
        }
    }
}

/// Re-check one line against the current catalog state.
///
/// A stale unit price is replaced in place; returns whether it changed.
///
/// # Errors
///
/// Returns the issue when the item is gone, inactive, or short on stock.
pub fn revalidate_line(
    item: &mut CartItemRecord,
    current: Option<&Purchasable>,
) -> Result<bool, LineIssue> {
    let Some(current) = current.filter(|current| current.is_active) else {
        return Err(LineIssue::Unavailable {
            name: item.display_name(),
        });
    };

    if current.stock < item.quantity {
        return Err(LineIssue::InsufficientStock {
            name: item.display_name(),
            available: current.stock,
        });
    }

    if item.unit_price == current.unit_price {
        return Ok(false);
    }

    item.unit_price = current.unit_price;

    Ok(true)
}

/// Result of re-checking every line of a cart before checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartValidation {
    pub cart: Cart,
    pub errors: Vec<String>,
}

impl CartValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
