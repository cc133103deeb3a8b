//! Wishlist service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::records::ProductUuid,
        users::records::UserUuid,
        wishlist::{
            errors::WishlistServiceError, records::WishlistItemRecord,
            repository::PgWishlistRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWishlistService {
    db: Db,
    repository: PgWishlistRepository,
}

impl PgWishlistService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWishlistRepository::new(),
        }
    }
}

#[async_trait]
impl WishlistService for PgWishlistService {
    async fn list_wishlist(
        &self,
        user: UserUuid,
    ) -> Result<Vec<WishlistItemRecord>, WishlistServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn add_to_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.add_item(&mut tx, user, product).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn remove_from_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.remove_item(&mut tx, user, product).await?;

        if rows_affected == 0 {
            return Err(WishlistServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait WishlistService: Send + Sync {
    /// Saved products, most recently saved first.
    async fn list_wishlist(
        &self,
        user: UserUuid,
    ) -> Result<Vec<WishlistItemRecord>, WishlistServiceError>;

    /// Save a product. Saving it again is a no-op.
    async fn add_to_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistServiceError>;

    async fn remove_from_wishlist(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistServiceError>;
}
