//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddCartItemRequest {
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,

    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_uuid.into(),
            variant_uuid: request.variant_uuid.map(Into::into),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Item Handler
///
/// Adding a product already in the cart increases that line's quantity.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Product not available"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let cart = state
        .app
        .carts
        .add_item(user.uuid, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::{CartsServiceError, MockCartsService, models::Cart},
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER, app_context, customer_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        let mut app = app_context();

        app.carts = Arc::new(carts);

        customer_service(app, Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn test_quantity_defaults_to_one() -> TestResult {
        let product = ProductUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .with(
                eq(TEST_CUSTOMER.uuid),
                eq(NewCartItem {
                    product_uuid: product,
                    variant_uuid: None,
                    quantity: 1,
                }),
            )
            .return_once(|user, _| Ok(Cart::empty(user)));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "productUuid": product.into_uuid() }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InsufficientStock { available: 1 }));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "productUuid": ProductUuid::new().into_uuid(), "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unavailable_product_returns_422() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::ProductUnavailable));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "productUuid": ProductUuid::new().into_uuid() }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
