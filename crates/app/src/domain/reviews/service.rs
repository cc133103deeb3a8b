//! Reviews service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::records::ProductUuid,
        reviews::{
            data::NewReview,
            errors::ReviewsServiceError,
            records::{ReviewRecord, ReviewUuid},
            repository::PgReviewsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    repository: PgReviewsRepository,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReviewsRepository::new(),
        }
    }
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    #[tracing::instrument(
        name = "reviews.service.create_review",
        skip(self, review),
        fields(user_uuid = %user, product_uuid = %product, rating = review.rating),
        err
    )]
    async fn create_review(
        &self,
        user: UserUuid,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ReviewsServiceError> {
        if !(1..=5).contains(&review.rating) {
            return Err(ReviewsServiceError::InvalidRating);
        }

        let mut tx = self.db.begin().await?;

        let verified_purchase = self
            .repository
            .has_delivered_purchase(&mut tx, user, product)
            .await?;

        let created = self
            .repository
            .create_review(&mut tx, user, product, review, verified_purchase)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_reviews(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<ReviewRecord>, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let reviews = self.repository.list_reviews(&mut tx, product).await?;

        tx.commit().await?;

        Ok(reviews)
    }

    async fn mark_helpful(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.increment_helpful(&mut tx, review).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn report(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.increment_report(&mut tx, review).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "reviews.service.moderate",
        skip(self),
        fields(review_uuid = %review),
        err
    )]
    async fn moderate(
        &self,
        review: ReviewUuid,
        approved: bool,
    ) -> Result<ReviewRecord, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .moderate_review(&mut tx, review, approved)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Review a product. Each shopper may review a product once.
    async fn create_review(
        &self,
        user: UserUuid,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ReviewsServiceError>;

    /// Approved reviews of a product, newest first.
    async fn list_reviews(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<ReviewRecord>, ReviewsServiceError>;

    async fn mark_helpful(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError>;

    async fn report(&self, review: ReviewUuid) -> Result<ReviewRecord, ReviewsServiceError>;

    /// Approve or hide a review.
    async fn moderate(
        &self,
        review: ReviewUuid,
        approved: bool,
    ) -> Result<ReviewRecord, ReviewsServiceError>;
}
