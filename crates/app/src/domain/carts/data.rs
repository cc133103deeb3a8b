//! Cart Data

use crate::domain::products::records::{ProductUuid, VariantUuid};

/// Item to add to the shopper's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub variant_uuid: Option<VariantUuid>,
    pub quantity: u32,
}
