//! Create Variant Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::products::{data::NewVariant, records::VariantUuid};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::VariantResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateVariantRequest {
    /// Display name, e.g. "UK 9"
    pub name: String,

    pub sku: String,

    /// Overrides the product price, in paise
    pub price: Option<u64>,

    #[serde(default)]
    pub stock: u32,
}

impl From<CreateVariantRequest> for NewVariant {
    fn from(request: CreateVariantRequest) -> Self {
        NewVariant {
            uuid: VariantUuid::new(),
            name: request.name,
            sku: request.sku,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Create Variant Handler
#[endpoint(
    tags("admin"),
    summary = "Add Product Variant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Variant created"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "SKU already taken"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateVariantRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VariantResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let variant = state
        .app
        .products
        .create_variant(product.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(variant.into()))
}
