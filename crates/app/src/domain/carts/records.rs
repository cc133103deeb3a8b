//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::products::records::{ProductUuid, VariantUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartRecord {
    pub uuid: CartUuid,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart line joined with the catalog data needed to show and price it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub variant_uuid: Option<VariantUuid>,
    pub name: String,
    pub variant_name: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub quantity: u32,

    /// Price captured when the line was last added or refreshed.
    pub unit_price: u64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItemRecord {
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }

    /// Human readable name used in shopper-facing messages.
    pub fn display_name(&self) -> String {
        match &self.variant_name {
            Some(variant) => format!("{} ({variant})", self.name),
            None => self.name.clone(),
        }
    }
}
