//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*, products::errors::into_status_error, products::get::ProductResponse,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns the catalog. `include_inactive` is honoured for admins only.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    include_inactive: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let include_inactive = user.is_admin() && include_inactive.into_inner().unwrap_or(false);

    let products = state
        .app
        .products
        .list_products(include_inactive)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::products::{MockProductsService, ProductsServiceError, records::ProductUuid},
    };

    use crate::test_helpers::{admin_service, app_context, customer_service, make_product};

    use super::*;

    fn route() -> Router {
        Router::with_path("products").get(handler)
    }

    fn with_products(products: MockProductsService) -> AppContext {
        let mut app = app_context();

        app.products = Arc::new(products);

        app
    }

    #[tokio::test]
    async fn test_index_returns_products_in_service_order() -> TestResult {
        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|include_inactive| !*include_inactive)
            .return_once(move |_| Ok(vec![make_product(uuid_a), make_product(uuid_b)]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&customer_service(with_products(products), route()))
            .await
            .take_json()
            .await?;

        let uuids: Vec<_> = response.products.iter().map(|p| p.uuid).collect();

        assert_eq!(uuids, vec![uuid_a.into_uuid(), uuid_b.into_uuid()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_customers_cannot_list_inactive_products() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|include_inactive| !*include_inactive)
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/products?include_inactive=true")
            .send(&customer_service(with_products(products), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_admins_can_list_inactive_products() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|include_inactive| *include_inactive)
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/products?include_inactive=true")
            .send(&admin_service(with_products(products), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_error_returns_500() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/products")
            .send(&customer_service(with_products(products), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
