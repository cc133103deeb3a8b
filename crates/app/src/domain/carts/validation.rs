//! Pre-checkout cart validation shared by the cart and order services.

use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::domain::{
    carts::{
        models::{Cart, CartValidation, revalidate_line},
        records::CartUuid,
        repositories::PgCartItemsRepository,
    },
    products::repository::PgProductsRepository,
};

pub(crate) const EMPTY_CART_MESSAGE: &str = "Cart is empty";

/// Re-check every line of `cart` against the catalog inside `tx`.
///
/// Stale prices are written back; unavailable lines are kept and reported.
pub(crate) async fn validate_cart_lines(
    tx: &mut Transaction<'_, Postgres>,
    cart_uuid: CartUuid,
    mut cart: Cart,
) -> Result<CartValidation, sqlx::Error> {
    let products = PgProductsRepository::new();
    let items = PgCartItemsRepository::new();

    if cart.is_empty() {
        return Ok(CartValidation {
            cart,
            errors: vec![EMPTY_CART_MESSAGE.to_string()],
        });
    }

    let mut errors = Vec::new();

    for line in &mut cart.items {
        let current = products
            .find_purchasable(tx, line.product_uuid, line.variant_uuid)
            .await?;

        match revalidate_line(line, current.as_ref()) {
            Ok(true) => {
                debug!(
                    cart_item = %line.uuid,
                    unit_price = line.unit_price,
                    "refreshed stale cart price"
                );

                items
                    .refresh_price(tx, cart_uuid, line.uuid, line.unit_price)
                    .await?;
            }
            Ok(false) => {}
            Err(issue) => errors.push(issue.to_string()),
        }
    }

    Ok(CartValidation { cart, errors })
}
