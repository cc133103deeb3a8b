//! Product Models

use crate::domain::products::records::{ProductUuid, VariantUuid};

/// A product, or one of its variants, resolved to what a shopper can buy right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchasable {
    pub product_uuid: ProductUuid,
    pub variant_uuid: Option<VariantUuid>,
    pub name: String,
    pub variant_name: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,

    /// Variant price override, falling back to the product price.
    pub unit_price: u64,

    /// Variant stock when a variant is selected, otherwise product stock.
    pub stock: u32,

    /// Both the product and the selected variant are active.
    pub is_active: bool,
}
