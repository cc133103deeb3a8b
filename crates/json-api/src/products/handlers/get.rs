//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::records::{ProductRecord, VariantRecord};

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub name: String,

    /// URL-safe unique name
    pub slug: String,

    pub image_url: Option<String>,

    pub category: Option<String>,

    pub brand: Option<String>,

    /// The price of the product in paise
    pub price: u64,

    /// Units on hand
    pub stock: u32,

    /// Whether shoppers can see and buy the product
    pub is_active: bool,

    pub variants: Vec<VariantResponse>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            slug: product.slug,
            image_url: product.image_url,
            category: product.category,
            brand: product.brand,
            price: product.price,
            stock: product.stock,
            is_active: product.is_active,
            variants: product.variants.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantResponse {
    pub uuid: Uuid,

    pub name: String,

    pub sku: String,

    /// Overrides the product price when set, in paise
    pub price: Option<u64>,

    pub stock: u32,

    pub is_active: bool,
}

impl From<VariantRecord> for VariantResponse {
    fn from(variant: VariantRecord) -> Self {
        VariantResponse {
            uuid: variant.uuid.into(),
            name: variant.name,
            sku: variant.sku,
            price: variant.price,
            stock: variant.stock,
            is_active: variant.is_active,
        }
    }
}

/// Get Product Handler
///
/// Returns a product with its variants. Inactive products are only visible to admins.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into(), user.is_admin())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
