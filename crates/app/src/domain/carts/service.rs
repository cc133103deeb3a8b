//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            models::{Cart, CartValidation},
            records::{CartItemUuid, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
            validation::{EMPTY_CART_MESSAGE, validate_cart_lines},
        },
        products::repository::PgProductsRepository,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        cart: CartUuid,
    ) -> Result<Cart, sqlx::Error> {
        let items = self.items_repository.list_items(tx, cart).await?;

        Ok(Cart {
            uuid: Some(cart),
            user_uuid: user,
            items,
        })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = match self.carts_repository.find_cart(&mut tx, user).await? {
            Some(cart) => self.load_cart(&mut tx, user, cart).await?,
            None => Cart::empty(user),
        };

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product_uuid,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let cart_uuid = self
            .carts_repository
            .lock_or_create_cart(&mut tx, user)
            .await?;

        let product = self
            .products_repository
            .find_purchasable(&mut tx, item.product_uuid, item.variant_uuid)
            .await?
            .filter(|product| product.is_active)
            .ok_or(CartsServiceError::ProductUnavailable)?;

        let cart = self.load_cart(&mut tx, user, cart_uuid).await?;

        let quantity = cart.merged_quantity(item.product_uuid, item.variant_uuid, item.quantity);

        if quantity > product.stock {
            return Err(CartsServiceError::InsufficientStock {
                available: product.stock,
            });
        }

        match cart.find_line(item.product_uuid, item.variant_uuid) {
            Some(line) => {
                self.items_repository
                    .update_item(&mut tx, cart_uuid, line.uuid, quantity, product.unit_price)
                    .await?;
            }
            None => {
                self.items_repository
                    .create_item(&mut tx, cart_uuid, item, product.unit_price)
                    .await?;
            }
        }

        self.carts_repository.touch_cart(&mut tx, cart_uuid).await?;

        let cart = self.load_cart(&mut tx, user, cart_uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    #[tracing::instrument(
        name = "carts.service.update_item",
        skip(self),
        fields(user_uuid = %user, cart_item = %item),
        err
    )]
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart_uuid = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        if quantity <= 0 {
            let rows_affected = self
                .items_repository
                .delete_item(&mut tx, cart_uuid, item)
                .await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::NotFound);
            }
        } else {
            let quantity =
                u32::try_from(quantity).map_err(|_ignored| CartsServiceError::InvalidQuantity)?;

            let cart = self.load_cart(&mut tx, user, cart_uuid).await?;

            let line = cart
                .items
                .iter()
                .find(|line| line.uuid == item)
                .ok_or(CartsServiceError::NotFound)?;

            let product = self
                .products_repository
                .find_purchasable(&mut tx, line.product_uuid, line.variant_uuid)
                .await?
                .filter(|product| product.is_active)
                .ok_or(CartsServiceError::ProductUnavailable)?;

            if quantity > product.stock {
                return Err(CartsServiceError::InsufficientStock {
                    available: product.stock,
                });
            }

            self.items_repository
                .update_item(&mut tx, cart_uuid, item, quantity, product.unit_price)
                .await?;
        }

        self.carts_repository.touch_cart(&mut tx, cart_uuid).await?;

        let cart = self.load_cart(&mut tx, user, cart_uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart_uuid = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let rows_affected = self
            .items_repository
            .delete_item(&mut tx, cart_uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let cart = self.load_cart(&mut tx, user, cart_uuid).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(cart_uuid) = self.carts_repository.lock_cart(&mut tx, user).await? {
            self.items_repository.clear_items(&mut tx, cart_uuid).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.validate_cart",
        skip(self),
        fields(user_uuid = %user, cart_errors = tracing::field::Empty),
        err
    )]
    async fn validate_cart(&self, user: UserUuid) -> Result<CartValidation, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(cart_uuid) = self.carts_repository.lock_cart(&mut tx, user).await? else {
            tx.commit().await?;

            return Ok(CartValidation {
                cart: Cart::empty(user),
                errors: vec![EMPTY_CART_MESSAGE.to_string()],
            });
        };

        let cart = self.load_cart(&mut tx, user, cart_uuid).await?;
        let validation = validate_cart_lines(&mut tx, cart_uuid, cart).await?;

        tx.commit().await?;

        tracing::Span::current().record("cart_errors", validation.errors.len());

        Ok(validation)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart; an empty cart when none is stored.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add an item, merging into an existing line for the same product and variant.
    async fn add_item(&self, user: UserUuid, item: NewCartItem) -> Result<Cart, CartsServiceError>;

    /// Set a line's quantity. A quantity of zero or less removes the line.
    async fn update_item(
        &self,
        user: UserUuid,
        item: CartItemUuid,
        quantity: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a single line.
    async fn remove_item(&self, user: UserUuid, item: CartItemUuid)
    -> Result<Cart, CartsServiceError>;

    /// Remove every line.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;

    /// Re-check every line against the catalog, refreshing stale prices.
    async fn validate_cart(&self, user: UserUuid) -> Result<CartValidation, CartsServiceError>;
}
