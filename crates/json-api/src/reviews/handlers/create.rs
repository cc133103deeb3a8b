//! Create Review Handler

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

use storefront_app::domain::reviews::{data::NewReview, records::ReviewUuid};

use crate::{
    extensions::*,
    reviews::{errors::into_status_error, index::ReviewResponse},
    state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateReviewRequest {
    /// 1 to 5 stars
    pub rating: u8,

    pub title: Option<String>,
    pub body: Option<String>,
}

/// Create Review Handler
///
/// One review per shopper and product. Reviews from shoppers who received the product are
/// flagged as verified purchases.
#[endpoint(
    tags("reviews"),
    summary = "Review Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Rating out of range"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Already reviewed"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let request = json.into_inner();

    let review = state
        .app
        .reviews
        .create_review(
            user.uuid,
            product.into_inner().into(),
            NewReview {
                uuid: ReviewUuid::new(),
                rating: request.rating,
                title: request.title,
                body: request.body,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        products::records::ProductUuid,
        reviews::{MockReviewsService, ReviewsServiceError},
    };

    use crate::test_helpers::{TEST_CUSTOMER, app_context, customer_service, make_review};

    use super::*;

    fn make_service(reviews: MockReviewsService) -> Service {
        let mut app = app_context();

        app.reviews = Arc::new(reviews);

        customer_service(
            app,
            Router::with_path("products/{product}/reviews").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_review_returns_201() -> TestResult {
        let product = ProductUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .withf(move |user, p, new| {
                *user == TEST_CUSTOMER.uuid && *p == product && new.rating == 4
            })
            .return_once(|_, p, new| Ok(make_review(new.uuid, p)));

        let mut res = TestClient::post(format!("http://example.com/products/{product}/reviews"))
            .json(&json!({ "rating": 4, "title": "Comfortable" }))
            .send(&make_service(reviews))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: ReviewResponse = res.take_json().await?;

        assert_eq!(body.product_uuid, product.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_rating_returns_400() -> TestResult {
        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .return_once(|_, _, _| Err(ReviewsServiceError::InvalidRating));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            ProductUuid::new()
        ))
        .json(&json!({ "rating": 6 }))
        .send(&make_service(reviews))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_second_review_returns_409() -> TestResult {
        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .return_once(|_, _, _| Err(ReviewsServiceError::AlreadyExists));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            ProductUuid::new()
        ))
        .json(&json!({ "rating": 5 }))
        .send(&make_service(reviews))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .return_once(|_, _, _| Err(ReviewsServiceError::InvalidReference));

        let res = TestClient::post(format!(
            "http://example.com/products/{}/reviews",
            ProductUuid::new()
        ))
        .json(&json!({ "rating": 5 }))
        .send(&make_service(reviews))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
