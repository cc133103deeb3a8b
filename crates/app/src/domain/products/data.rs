//! Products Data

use crate::domain::products::records::{ProductUuid, VariantUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: u64,
    pub stock: u32,
    pub is_active: bool,
}

/// Product Update Data
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub is_active: Option<bool>,
}

/// New Variant Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub name: String,
    pub sku: String,
    pub price: Option<u64>,
    pub stock: u32,
}
