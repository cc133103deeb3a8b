//! Save To Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State, wishlist::errors::into_status_error};

/// Save To Wishlist Handler
///
/// Idempotent. Saving a product twice keeps one entry.
#[endpoint(
    tags("wishlist"),
    summary = "Save To Wishlist",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Product saved"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    state
        .app
        .wishlist
        .add_to_wishlist(user.uuid, product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use storefront_app::domain::{
        products::records::ProductUuid,
        wishlist::{MockWishlistService, WishlistServiceError},
    };

    use crate::test_helpers::{TEST_CUSTOMER, app_context, customer_service};

    use super::*;

    fn make_service(wishlist: MockWishlistService) -> Service {
        let mut app = app_context();

        app.wishlist = Arc::new(wishlist);

        customer_service(app, Router::with_path("wishlist/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_save_returns_204() -> TestResult {
        let product = ProductUuid::new();

        let mut wishlist = MockWishlistService::new();

        wishlist
            .expect_add_to_wishlist()
            .once()
            .withf(move |user, p| *user == TEST_CUSTOMER.uuid && *p == product)
            .return_once(|_, _| Ok(()));

        let res = TestClient::put(format!("http://example.com/wishlist/{product}"))
            .send(&make_service(wishlist))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let mut wishlist = MockWishlistService::new();

        wishlist
            .expect_add_to_wishlist()
            .once()
            .return_once(|_, _| Err(WishlistServiceError::InvalidReference));

        let res = TestClient::put(format!("http://example.com/wishlist/{}", ProductUuid::new()))
            .send(&make_service(wishlist))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
