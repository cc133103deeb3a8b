//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::{models::Cart, records::CartItemRecord};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    /// Absent until the first item is added
    pub uuid: Option<Uuid>,

    pub items: Vec<CartItemResponse>,

    /// Sum of line totals in paise
    pub subtotal: u64,

    /// Total units across all lines
    pub item_count: u32,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let subtotal = cart.subtotal();
        let item_count = cart.item_count();

        CartResponse {
            uuid: cart.uuid.map(Into::into),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal,
            item_count,
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub variant_uuid: Option<Uuid>,
    pub name: String,
    pub variant_name: Option<String>,
    pub image_url: Option<String>,
    pub quantity: u32,

    /// Price per unit in paise, as of the last validation
    pub unit_price: u64,

    pub line_total: u64,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        let line_total = item.line_total();

        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            variant_uuid: item.variant_uuid.map(Into::into),
            name: item.name,
            variant_name: item.variant_name,
            image_url: item.image_url,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, empty when nothing has been added yet.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::{
            MockCartsService,
            records::{CartItemUuid, CartUuid},
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER, app_context, customer_service};

    use super::*;

    fn make_item(name: &str, unit_price: u64, quantity: u32) -> CartItemRecord {
        CartItemRecord {
            uuid: CartItemUuid::new(),
            product_uuid: ProductUuid::new(),
            variant_uuid: None,
            name: name.to_string(),
            variant_name: None,
            image_url: None,
            category: None,
            brand: None,
            quantity,
            unit_price,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn make_service(carts: MockCartsService) -> Service {
        let mut app = app_context();

        app.carts = Arc::new(carts);

        customer_service(app, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_get_cart_totals_lines() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_CUSTOMER.uuid)
            .return_once(|user| {
                Ok(Cart {
                    uuid: Some(CartUuid::new()),
                    user_uuid: user,
                    items: vec![make_item("Mug", 150_00, 2), make_item("Tea", 45_50, 1)],
                })
            });

        let body: CartResponse = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await
            .take_json()
            .await?;

        assert_eq!(body.subtotal, 345_50);
        assert_eq!(body.item_count, 3);
        assert_eq!(
            body.items.first().map(|item| item.line_total),
            Some(300_00)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_cart_without_cart_is_empty() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .return_once(|user| Ok(Cart::empty(user)));

        let body: CartResponse = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await
            .take_json()
            .await?;

        assert!(body.uuid.is_none(), "no cart should be stored yet");
        assert!(body.items.is_empty(), "cart should be empty");
        assert_eq!(body.subtotal, 0);

        Ok(())
    }
}
