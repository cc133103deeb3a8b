//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::try_get_count,
    domain::{
        products::records::ProductUuid,
        reviews::{
            data::NewReview,
            records::{ReviewRecord, ReviewUuid},
        },
        users::records::UserUuid,
    },
};

const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const HAS_DELIVERED_PURCHASE_SQL: &str = include_str!("sql/has_delivered_purchase.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const INCREMENT_HELPFUL_SQL: &str = include_str!("sql/increment_helpful.sql");
const INCREMENT_REPORT_SQL: &str = include_str!("sql/increment_report.sql");
const MODERATE_REVIEW_SQL: &str = include_str!("sql/moderate_review.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        review: NewReview,
        verified_purchase: bool,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(i16::from(review.rating))
            .bind(review.title)
            .bind(review.body)
            .bind(verified_purchase)
            .fetch_one(&mut **tx)
            .await
    }

    /// Whether `user` has a delivered order containing `product`.
    pub(crate) async fn has_delivered_purchase(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(HAS_DELIVERED_PURCHASE_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<ReviewRecord>, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(LIST_REVIEWS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn increment_helpful(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(INCREMENT_HELPFUL_SQL)
            .bind(review.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn increment_report(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(INCREMENT_REPORT_SQL)
            .bind(review.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn moderate_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
        approved: bool,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(MODERATE_REVIEW_SQL)
            .bind(review.into_uuid())
            .bind(approved)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;
        let rating = u8::try_from(rating).map_err(|e| sqlx::Error::ColumnDecode {
            index: "rating".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            rating,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            verified_purchase: row.try_get("verified_purchase")?,
            is_approved: row.try_get("is_approved")?,
            helpful_count: try_get_count(row, "helpful_count")?,
            report_count: try_get_count(row, "report_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
