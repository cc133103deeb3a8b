//! Carts Repository

use sqlx::{Postgres, Transaction, query, query_scalar};
use uuid::Uuid;

use crate::domain::{carts::records::CartUuid, users::records::UserUuid};

const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const ENSURE_CART_SQL: &str = include_str!("../sql/ensure_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartUuid>, sqlx::Error> {
        let uuid: Option<Uuid> = query_scalar(FIND_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(CartUuid::from_uuid))
    }

    /// Lock the user's cart row for the rest of the transaction.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartUuid>, sqlx::Error> {
        let uuid: Option<Uuid> = query_scalar(LOCK_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(CartUuid::from_uuid))
    }

    /// Create the user's cart if missing, then lock it.
    pub(crate) async fn lock_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartUuid, sqlx::Error> {
        query(ENSURE_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        self.lock_cart(tx, user)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
