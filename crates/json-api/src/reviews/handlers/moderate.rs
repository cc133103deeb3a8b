//! Moderate Review Handler

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

use crate::{
    extensions::*,
    reviews::{errors::into_status_error, index::ReviewResponse},
    state::State,
};

/// Moderate Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ModerateReviewRequest {
    /// `false` hides the review from listings
    pub approved: bool,
}

/// Moderate Review Handler
#[endpoint(
    tags("admin"),
    summary = "Moderate Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Review moderated"),
        (status_code = StatusCode::NOT_FOUND, description = "Review not found"),
    ),
)]
pub(crate) async fn handler(
    review: PathParam<Uuid>,
    json: JsonBody<ModerateReviewRequest>,
    depot: &mut Depot,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let review = state
        .app
        .reviews
        .moderate(review.into_inner().into(), json.into_inner().approved)
        .await
        .map_err(into_status_error)?;

    Ok(Json(review.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::{
        products::records::ProductUuid,
        reviews::{MockReviewsService, records::ReviewUuid},
    };

    use crate::test_helpers::{admin_service, app_context, make_review};

    use super::*;

    #[tokio::test]
    async fn test_hiding_a_review() -> TestResult {
        let uuid = ReviewUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_moderate()
            .once()
            .withf(move |u, approved| *u == uuid && !*approved)
            .return_once(|u, approved| {
                let mut review = make_review(u, ProductUuid::new());

                review.is_approved = approved;

                Ok(review)
            });

        let mut app = app_context();

        app.reviews = Arc::new(reviews);

        let mut res = TestClient::put(format!(
            "http://example.com/admin/reviews/{uuid}/moderation"
        ))
        .json(&json!({ "approved": false }))
        .send(&admin_service(
            app,
            Router::with_path("admin/reviews/{review}/moderation").put(handler),
        ))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ReviewResponse = res.take_json().await?;

        assert!(!body.is_approved);

        Ok(())
    }
}
