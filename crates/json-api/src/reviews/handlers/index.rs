//! List Reviews Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::reviews::records::ReviewRecord;

use crate::{extensions::*, reviews::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub user_uuid: Uuid,

    /// 1 to 5 stars
    pub rating: u8,

    pub title: Option<String>,
    pub body: Option<String>,

    /// The author had received the product when they wrote the review
    pub verified_purchase: bool,

    pub is_approved: bool,
    pub helpful_count: u32,
    pub created_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        ReviewResponse {
            uuid: review.uuid.into(),
            product_uuid: review.product_uuid.into(),
            user_uuid: review.user_uuid.into(),
            rating: review.rating,
            title: review.title,
            body: review.body,
            verified_purchase: review.verified_purchase,
            is_approved: review.is_approved,
            helpful_count: review.helpful_count,
            created_at: review.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
}

/// List Reviews Handler
///
/// Approved reviews of a product, newest first.
#[endpoint(
    tags("reviews"),
    summary = "List Product Reviews",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Reviews"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reviews = state
        .app
        .reviews
        .list_reviews(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReviewsResponse {
        reviews: reviews.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        products::records::ProductUuid,
        reviews::{MockReviewsService, records::ReviewUuid},
    };

    use crate::test_helpers::{app_context, customer_service, make_review};

    use super::*;

    #[tokio::test]
    async fn test_list_reviews_for_product() -> TestResult {
        let product = ProductUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_list_reviews()
            .once()
            .withf(move |p| *p == product)
            .return_once(move |p| Ok(vec![make_review(ReviewUuid::new(), p)]));

        let mut app = app_context();

        app.reviews = Arc::new(reviews);

        let mut res = TestClient::get(format!("http://example.com/products/{product}/reviews"))
            .send(&customer_service(
                app,
                Router::with_path("products/{product}/reviews").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ReviewsResponse = res.take_json().await?;

        assert_eq!(body.reviews.len(), 1);
        assert!(body.reviews.iter().all(|review| review.verified_purchase));

        Ok(())
    }
}
