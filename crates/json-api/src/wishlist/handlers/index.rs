//! List Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::wishlist::records::WishlistItemRecord;

use crate::{extensions::*, state::State, wishlist::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WishlistItemResponse {
    pub product_uuid: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,

    /// Current price in paise
    pub price: u64,

    /// Saved products stay listed after they are delisted
    pub is_active: bool,

    /// When the product was saved
    pub created_at: String,
}

impl From<WishlistItemRecord> for WishlistItemResponse {
    fn from(item: WishlistItemRecord) -> Self {
        WishlistItemResponse {
            product_uuid: item.product_uuid.into(),
            name: item.name,
            slug: item.slug,
            image_url: item.image_url,
            price: item.price,
            is_active: item.is_active,
            created_at: item.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WishlistResponse {
    pub items: Vec<WishlistItemResponse>,
}

/// List Wishlist Handler
#[endpoint(
    tags("wishlist"),
    summary = "List Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Saved products"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<WishlistResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let items = state
        .app
        .wishlist
        .list_wishlist(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(WishlistResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}
