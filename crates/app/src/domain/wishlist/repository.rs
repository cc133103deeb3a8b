//! Wishlist Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::try_get_amount,
    domain::{
        products::records::ProductUuid, users::records::UserUuid,
        wishlist::records::WishlistItemRecord,
    },
};

const LIST_WISHLIST_SQL: &str = include_str!("sql/list_wishlist.sql");
const ADD_TO_WISHLIST_SQL: &str = include_str!("sql/add_to_wishlist.sql");
const REMOVE_FROM_WISHLIST_SQL: &str = include_str!("sql/remove_from_wishlist.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistRepository;

impl PgWishlistRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<WishlistItemRecord>, sqlx::Error> {
        query_as::<Postgres, WishlistItemRecord>(LIST_WISHLIST_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn add_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), sqlx::Error> {
        query(ADD_TO_WISHLIST_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn remove_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_FROM_WISHLIST_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            image_url: row.try_get("image_url")?,
            price: try_get_amount(row, "price")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
