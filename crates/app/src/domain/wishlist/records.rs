//! Wishlist Records

use jiff::Timestamp;

use crate::domain::{products::records::ProductUuid, users::records::UserUuid};

/// A saved product, with enough catalog detail to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistItemRecord {
    pub user_uuid: UserUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub price: u64,
    pub is_active: bool,
    pub created_at: Timestamp,
}
