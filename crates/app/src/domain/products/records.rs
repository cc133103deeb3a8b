//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: u64,
    pub stock: u32,
    pub is_active: bool,
    pub variants: Vec<VariantRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Product Variant Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub sku: String,

    /// Overrides the product price when set.
    pub price: Option<u64>,

    pub stock: u32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
