//! Validate Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::carts::models::CartValidation;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartValidationResponse {
    /// True when every line can be ordered as-is
    pub valid: bool,

    /// One message per line that cannot be ordered
    pub errors: Vec<String>,

    /// The cart with refreshed prices
    pub cart: CartResponse,
}

impl From<CartValidation> for CartValidationResponse {
    fn from(validation: CartValidation) -> Self {
        Self {
            valid: validation.is_valid(),
            errors: validation.errors,
            cart: validation.cart.into(),
        }
    }
}

/// Validate Cart Handler
///
/// Re-checks every line against the catalog and refreshes stale prices.
#[endpoint(
    tags("cart"),
    summary = "Validate Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<CartValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let validation = state
        .app
        .carts
        .validate_cart(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(validation.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::carts::{MockCartsService, models::Cart};

    use crate::test_helpers::{app_context, customer_service};

    use super::*;

    #[tokio::test]
    async fn test_invalid_lines_are_reported() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_validate_cart().once().return_once(|user| {
            Ok(CartValidation {
                cart: Cart::empty(user),
                errors: vec!["Trail Shoe is no longer available".to_string()],
            })
        });

        let mut app = app_context();

        app.carts = Arc::new(carts);

        let body: CartValidationResponse = TestClient::post("http://example.com/cart/validate")
            .send(&customer_service(
                app,
                Router::with_path("cart/validate").post(handler),
            ))
            .await
            .take_json()
            .await?;

        assert!(!body.valid, "cart should be invalid");
        assert_eq!(body.errors, vec!["Trail Shoe is no longer available"]);

        Ok(())
    }
}
