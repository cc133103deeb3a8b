//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::{
            models::Cart,
            records::CartItemRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
            validation::validate_cart_lines,
        },
        coupons::{
            evaluation::USAGE_LIMIT_REACHED, repository::PgCouponsRepository, resolve_coupon,
        },
        events::{OrderEvent, OrderEventsDispatcher},
        orders::{
            data::{NewOrder, StatusUpdate},
            errors::OrdersServiceError,
            number::generate_order_number,
            pricing::compute_totals,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid, StatusHistoryRecord},
            repository::{OrderDraft, PgOrdersRepository},
            status::{OrderStatus, PaymentMethod, PaymentStatus},
        },
        products::repository::PgProductsRepository,
        users::records::UserUuid,
    },
};

/// Copy cart lines into order lines, fixing name, image and price as they are now.
pub(crate) fn snapshot_items(order: OrderUuid, lines: &[CartItemRecord]) -> Vec<OrderItemRecord> {
    lines
        .iter()
        .map(|line| OrderItemRecord {
            uuid: OrderItemUuid::new(),
            order_uuid: order,
            product_uuid: line.product_uuid,
            variant_uuid: line.variant_uuid,
            name: line.name.clone(),
            variant_name: line.variant_name.clone(),
            image_url: line.image_url.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
        })
        .collect()
}

/// Check a back-office move of `order` to `next`, other than cancellation.
pub(crate) fn check_status_change(
    order: &OrderRecord,
    next: OrderStatus,
) -> Result<(), OrdersServiceError> {
    if !order.status.can_transition_to(next) {
        return Err(OrdersServiceError::InvalidTransition {
            from: order.status,
            to: next,
        });
    }

    // Gateway and card orders are confirmed by payment verification.
    if order.status == OrderStatus::Pending
        && next == OrderStatus::Confirmed
        && order.payment_method != PaymentMethod::Cod
        && order.payment_status != PaymentStatus::Paid
    {
        return Err(OrdersServiceError::AwaitingPayment);
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    events: OrderEventsDispatcher,
    repository: PgOrdersRepository,
    addresses_repository: PgAddressesRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    coupons_repository: PgCouponsRepository,
    products_repository: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, events: OrderEventsDispatcher) -> Self {
        Self {
            db,
            events,
            repository: PgOrdersRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        owner: Option<UserUuid>,
        lock: bool,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let found = if lock {
            self.repository.lock_order(tx, order, owner).await?
        } else {
            self.repository.find_order(tx, order, owner).await?
        };

        let mut order = found.ok_or(OrdersServiceError::NotFound)?;

        self.repository
            .attach_items(tx, std::slice::from_mut(&mut order))
            .await?;

        Ok(order)
    }

    /// Cancel a locked order and put its stock back.
    async fn cancel_locked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
        reason: Option<&str>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if !order.status.is_cancellable() {
            return Err(OrdersServiceError::NotCancellable);
        }

        for item in &order.items {
            self.products_repository
                .increment_stock(tx, item.product_uuid, item.variant_uuid, item.quantity)
                .await?;
        }

        let mut cancelled = self.repository.cancel_order(tx, order.uuid, reason).await?;
        cancelled.items = order.items;

        Ok(cancelled)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            user_uuid = %user,
            payment_method = %order.payment_method,
            order_uuid = tracing::field::Empty,
            order_number = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let shipping = order.shipping_address;
        let billing = order.billing_address.unwrap_or(shipping);

        for address in [shipping, billing] {
            self.addresses_repository
                .find_address(&mut tx, user, address)
                .await?
                .ok_or(OrdersServiceError::InvalidAddress)?;
        }

        let cart_uuid = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(OrdersServiceError::EmptyCart)?;

        let cart = Cart {
            uuid: Some(cart_uuid),
            user_uuid: user,
            items: self.items_repository.list_items(&mut tx, cart_uuid).await?,
        };

        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let validation = validate_cart_lines(&mut tx, cart_uuid, cart).await?;

        if !validation.is_valid() {
            return Err(OrdersServiceError::CartInvalid(validation.errors));
        }

        let cart = validation.cart;
        let subtotal = cart.subtotal();
        let now = Timestamp::now();

        let coupon = match order.coupon_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                let resolved = resolve_coupon(
                    &mut tx,
                    &self.coupons_repository,
                    user,
                    code,
                    &cart.items,
                    now,
                )
                .await?
                .ok_or(OrdersServiceError::CouponNotFound)?;

                if !resolved.evaluation.check.can_apply {
                    return Err(OrdersServiceError::CouponRejected(
                        resolved.evaluation.check.reason.unwrap_or_default(),
                    ));
                }

                Some(resolved)
            }
            _ => None,
        };

        let discount = coupon
            .as_ref()
            .map_or(0, |resolved| resolved.evaluation.discount);

        let totals = compute_totals(subtotal, discount);
        let order_uuid = OrderUuid::new();
        let order_number = generate_order_number(now, &mut rand::thread_rng());

        let mut created = self
            .repository
            .create_order(
                &mut tx,
                OrderDraft {
                    uuid: order_uuid,
                    order_number,
                    user_uuid: user,
                    shipping_address_uuid: shipping,
                    billing_address_uuid: billing,
                    payment_method: order.payment_method,
                    totals,
                    coupon: coupon
                        .as_ref()
                        .map(|resolved| (resolved.coupon.uuid, resolved.coupon.code.clone())),
                    notes: order.notes,
                },
            )
            .await?;

        let items = snapshot_items(order_uuid, &cart.items);

        self.repository.create_items(&mut tx, &items).await?;

        for item in &items {
            let taken = self
                .products_repository
                .decrement_stock(&mut tx, item.product_uuid, item.variant_uuid, item.quantity)
                .await?;

            if !taken {
                return Err(OrdersServiceError::OutOfStock {
                    name: item.name.clone(),
                });
            }
        }

        if let Some(resolved) = &coupon {
            let counted = self
                .coupons_repository
                .increment_usage(&mut tx, resolved.coupon.uuid)
                .await?;

            if !counted {
                return Err(OrdersServiceError::CouponRejected(
                    USAGE_LIMIT_REACHED.to_string(),
                ));
            }

            self.coupons_repository
                .create_redemption(&mut tx, resolved.coupon.uuid, user, order_uuid)
                .await?;
        }

        self.items_repository.clear_items(&mut tx, cart_uuid).await?;

        tx.commit().await?;

        created.items = items;

        let span = tracing::Span::current();
        span.record("order_uuid", tracing::field::display(created.uuid));
        span.record("order_number", created.order_number.as_str());

        info!(total = created.totals.total, "order placed");

        self.events.dispatch(OrderEvent::transition(&created, None).by(Some(user)));

        Ok(created)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.load_order(&mut tx, order, Some(user), false).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.repository.list_user_orders(&mut tx, user).await?;

        self.repository.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self, reason),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.load_order(&mut tx, order, Some(user), true).await?;
        let old_status = current.status;

        let cancelled = self
            .cancel_locked(&mut tx, current, reason.as_deref())
            .await?;

        tx.commit().await?;

        self.events.dispatch(
            OrderEvent::transition(&cancelled, Some(old_status))
                .by(Some(user))
                .with_reason(reason),
        );

        Ok(cancelled)
    }

    async fn get_history(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Vec<StatusHistoryRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .find_order(&mut tx, order, Some(user))
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let history = self.repository.list_history(&mut tx, order).await?;

        tx.commit().await?;

        Ok(history)
    }

    async fn list_all_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.repository.list_all_orders(&mut tx).await?;

        self.repository.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self, update),
        fields(order_uuid = %order, status = %update.status, actor_uuid = %update.actor),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.load_order(&mut tx, order, None, true).await?;
        let old_status = current.status;

        let updated = if update.status == OrderStatus::Cancelled {
            self.cancel_locked(&mut tx, current, update.notes.as_deref())
                .await?
        } else {
            check_status_change(&current, update.status)?;

            let delivered = update.status == OrderStatus::Delivered;
            let collect_cash = delivered && current.payment_method == PaymentMethod::Cod;

            let mut updated = self
                .repository
                .update_status(&mut tx, order, update.status, delivered, collect_cash)
                .await?;

            updated.items = current.items;
            updated
        };

        tx.commit().await?;

        debug!(from = %old_status, to = %updated.status, "order status changed");

        self.events.dispatch(
            OrderEvent::transition(&updated, Some(old_status))
                .by(Some(update.actor))
                .with_notes(update.notes),
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the shopper's cart into a pending order.
    async fn create_order(
        &self,
        user: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve one of the shopper's orders.
    async fn get_order(&self, user: UserUuid, order: OrderUuid)
    -> Result<OrderRecord, OrdersServiceError>;

    /// The shopper's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Cancel a pending or confirmed order and restock its lines.
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Status transitions of one of the shopper's orders, oldest first.
    async fn get_history(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Vec<StatusHistoryRecord>, OrdersServiceError>;

    /// Every order, newest first.
    async fn list_all_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Move an order through its lifecycle on behalf of staff.
    async fn update_status(
        &self,
        order: OrderUuid,
        update: StatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        domain::{
            addresses::AddressesService,
            carts::{CartsService, data::NewCartItem, records::CartItemUuid},
            coupons::{CouponsService, records::DiscountType},
            orders::pricing::OrderTotals,
            products::{ProductsService, records::ProductUuid},
        },
        test::{
            TestContext,
            helpers::{new_address, new_coupon, new_product, order_record},
        },
    };

    use super::*;

    fn cart_line(name: &str, unit_price: u64, quantity: u32) -> CartItemRecord {
        let now = Timestamp::now();

        CartItemRecord {
            uuid: CartItemUuid::new(),
            product_uuid: ProductUuid::new(),
            variant_uuid: None,
            name: name.to_string(),
            variant_name: None,
            image_url: Some(format!("https://cdn.example.com/{name}.png")),
            category: None,
            brand: None,
            quantity,
            unit_price,
            created_at: now,
            updated_at: now,
        }
    }

    fn order_in(status: OrderStatus, method: PaymentMethod, paid: PaymentStatus) -> OrderRecord {
        OrderRecord {
            status,
            payment_method: method,
            payment_status: paid,
            ..order_record()
        }
    }

    #[test]
    fn snapshot_copies_line_details() {
        let order = OrderUuid::new();
        let line = cart_line("Kettle", 1_250_00, 2);

        let items = snapshot_items(order, std::slice::from_ref(&line));

        let item = items.first().expect("one item");

        assert_eq!(item.order_uuid, order);
        assert_eq!(item.product_uuid, line.product_uuid);
        assert_eq!(item.name, "Kettle");
        assert_eq!(item.image_url, line.image_url);
        assert_eq!(item.unit_price, 1_250_00);
        assert_eq!(item.line_total, 2_500_00);
    }

    #[test]
    fn unpaid_gateway_order_cannot_be_confirmed_by_staff() {
        let order = order_in(OrderStatus::Pending, PaymentMethod::Gateway, PaymentStatus::Pending);

        let result = check_status_change(&order, OrderStatus::Confirmed);

        assert!(
            matches!(result, Err(OrdersServiceError::AwaitingPayment)),
            "expected AwaitingPayment, got {result:?}"
        );
    }

    #[test]
    fn cash_on_delivery_order_can_be_confirmed_by_staff() {
        let order = order_in(OrderStatus::Pending, PaymentMethod::Cod, PaymentStatus::Pending);

        assert!(check_status_change(&order, OrderStatus::Confirmed).is_ok());
    }

    #[test]
    fn skipping_ahead_is_an_invalid_transition() {
        let order = order_in(OrderStatus::Confirmed, PaymentMethod::Cod, PaymentStatus::Pending);

        let result = check_status_change(&order, OrderStatus::Delivered);

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::InvalidTransition {
                    from: OrderStatus::Confirmed,
                    to: OrderStatus::Delivered
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );
    }

    struct Checkout {
        ctx: TestContext,
        user: UserUuid,
        product: ProductUuid,
        order: NewOrder,
    }

    async fn checkout(price: u64, stock: u32, quantity: u32) -> TestResult<Checkout> {
        let ctx = TestContext::new().await;
        let user = ctx.create_customer("buyer@example.com").await;
        let address = ctx.addresses.create_address(user, new_address()).await?;
        let product = ctx.products.create_product(new_product("Blender", price, stock)).await?;

        ctx.carts
            .add_item(
                user,
                NewCartItem {
                    product_uuid: product.uuid,
                    variant_uuid: None,
                    quantity,
                },
            )
            .await?;

        let order = NewOrder {
            shipping_address: address.uuid,
            billing_address: None,
            payment_method: PaymentMethod::Cod,
            coupon_code: None,
            notes: Some("leave at the door".to_string()),
        };

        Ok(Checkout {
            ctx,
            user,
            product: product.uuid,
            order,
        })
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn create_order_without_coupon_prices_and_clears_cart() -> TestResult {
        let Checkout {
            ctx,
            user,
            product,
            order,
        } = checkout(150_00, 10, 2).await?;

        let created = ctx.orders.create_order(user, order).await?;

        assert_eq!(created.status, OrderStatus::Pending);
        assert_eq!(
            created.totals,
            OrderTotals {
                subtotal: 300_00,
                discount: 0,
                tax: 54_00,
                shipping: 50_00,
                total: 404_00,
            }
        );
        assert!(created.order_number.starts_with("ORD-"));
        assert_eq!(created.items.len(), 1);

        assert!(ctx.carts.get_cart(user).await?.is_empty());
        assert_eq!(ctx.products.get_product(product, true).await?.stock, 8);

        ctx.events.flush().await;

        let history = ctx.orders.get_history(user, created.uuid).await?;
        let first = history.first().expect("initial history record");

        assert_eq!(first.old_status, None);
        assert_eq!(first.new_status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn create_order_with_percentage_coupon() -> TestResult {
        let Checkout {
            ctx, user, mut order, ..
        } = checkout(500_00, 10, 2).await?;

        ctx.coupons
            .create_coupon(new_coupon("SAVE10", DiscountType::Percentage, 10))
            .await?;

        order.coupon_code = Some("save10".to_string());

        let created = ctx.orders.create_order(user, order).await?;

        assert_eq!(created.totals.discount, 100_00);
        assert_eq!(created.totals.tax, 162_00);
        assert_eq!(created.totals.shipping, 0);
        assert_eq!(created.totals.total, 1_062_00);
        assert_eq!(created.coupon_code.as_deref(), Some("SAVE10"));

        let coupons = ctx.coupons.list_coupons().await?;

        assert_eq!(coupons.first().map(|coupon| coupon.used_count), Some(1));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn rejected_coupon_leaves_cart_and_stock_untouched() -> TestResult {
        let Checkout {
            ctx,
            user,
            product,
            mut order,
        } = checkout(100_00, 5, 1).await?;

        let mut coupon = new_coupon("LASTYEAR", DiscountType::Fixed, 10_00);
        coupon.expires_at = Some(Timestamp::UNIX_EPOCH);
        ctx.coupons.create_coupon(coupon).await?;

        order.coupon_code = Some("LASTYEAR".to_string());

        let result = ctx.orders.create_order(user, order).await;

        assert!(
            matches!(
                &result,
                Err(OrdersServiceError::CouponRejected(reason)) if reason == "Coupon is not valid"
            ),
            "expected CouponRejected, got {result:?}"
        );

        assert_eq!(ctx.carts.get_cart(user).await?.item_count(), 1);
        assert_eq!(ctx.products.get_product(product, true).await?.stock, 5);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn create_order_with_someone_elses_address_is_rejected() -> TestResult {
        let Checkout {
            ctx, user, mut order, ..
        } = checkout(100_00, 5, 1).await?;

        let stranger = ctx.create_customer("stranger@example.com").await;
        let theirs = ctx.addresses.create_address(stranger, new_address()).await?;

        order.shipping_address = theirs.uuid;

        let result = ctx.orders.create_order(user, order).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidAddress)),
            "expected InvalidAddress, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn create_order_with_empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_customer("nobody@example.com").await;
        let address = ctx.addresses.create_address(user, new_address()).await?;

        let result = ctx
            .orders
            .create_order(
                user,
                NewOrder {
                    shipping_address: address.uuid,
                    billing_address: None,
                    payment_method: PaymentMethod::Cod,
                    coupon_code: None,
                    notes: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn cancelling_pending_order_restocks_every_line() -> TestResult {
        let Checkout {
            ctx,
            user,
            product,
            order,
        } = checkout(100_00, 5, 3).await?;

        let created = ctx.orders.create_order(user, order).await?;

        assert_eq!(ctx.products.get_product(product, true).await?.stock, 2);

        let cancelled = ctx
            .orders
            .cancel_order(user, created.uuid, Some("changed my mind".to_string()))
            .await?;

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("changed my mind"));
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(ctx.products.get_product(product, true).await?.stock, 5);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn shipped_order_cannot_be_cancelled_and_keeps_stock() -> TestResult {
        let Checkout {
            ctx,
            user,
            product,
            order,
        } = checkout(100_00, 5, 1).await?;

        let admin = ctx.create_customer("staff@example.com").await;
        let created = ctx.orders.create_order(user, order).await?;

        for status in [OrderStatus::Confirmed, OrderStatus::Processing, OrderStatus::Shipped] {
            ctx.orders
                .update_status(
                    created.uuid,
                    StatusUpdate {
                        status,
                        actor: admin,
                        notes: None,
                    },
                )
                .await?;
        }

        let result = ctx.orders.cancel_order(user, created.uuid, None).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotCancellable)),
            "expected NotCancellable, got {result:?}"
        );

        assert_eq!(ctx.products.get_product(product, true).await?.stock, 4);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn delivering_cash_order_marks_it_paid() -> TestResult {
        let Checkout {
            ctx, user, order, ..
        } = checkout(100_00, 5, 1).await?;

        let admin = ctx.create_customer("courier@example.com").await;
        let created = ctx.orders.create_order(user, order).await?;

        let mut last = created.clone();

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            last = ctx
                .orders
                .update_status(
                    created.uuid,
                    StatusUpdate {
                        status,
                        actor: admin,
                        notes: None,
                    },
                )
                .await?;
        }

        assert_eq!(last.status, OrderStatus::Delivered);
        assert_eq!(last.payment_status, PaymentStatus::Paid);
        assert!(last.delivered_at.is_some());

        ctx.events.flush().await;

        let history = ctx.orders.get_history(user, created.uuid).await?;

        assert_eq!(history.len(), 5);
        assert_eq!(history.last().and_then(|record| record.actor_uuid), Some(admin));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn other_shoppers_cannot_see_an_order() -> TestResult {
        let Checkout {
            ctx, user, order, ..
        } = checkout(100_00, 5, 1).await?;

        let created = ctx.orders.create_order(user, order).await?;
        let stranger = ctx.create_customer("nosy@example.com").await;

        let result = ctx.orders.get_order(stranger, created.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        assert_eq!(ctx.orders.list_orders(stranger).await?.len(), 0);
        assert_eq!(ctx.orders.list_all_orders().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the Postgres testcontainer"]
    async fn listed_orders_carry_only_their_own_items() -> TestResult {
        let Checkout {
            ctx, user, order, ..
        } = checkout(100_00, 5, 1).await?;

        let first = ctx.orders.create_order(user, order.clone()).await?;
        let toaster = ctx.products.create_product(new_product("Toaster", 80_00, 5)).await?;

        ctx.carts
            .add_item(
                user,
                NewCartItem {
                    product_uuid: toaster.uuid,
                    variant_uuid: None,
                    quantity: 2,
                },
            )
            .await?;

        let second = ctx.orders.create_order(user, order).await?;
        let listed = ctx.orders.list_orders(user).await?;

        assert_eq!(listed.len(), 2);

        for listed_order in &listed {
            assert_eq!(listed_order.items.len(), 1);
            assert!(listed_order.items.iter().all(|item| item.order_uuid == listed_order.uuid));
        }

        let second_product = listed
            .iter()
            .find(|listed_order| listed_order.uuid == second.uuid)
            .and_then(|listed_order| listed_order.items.first())
            .map(|item| item.product_uuid);

        assert_eq!(second_product, Some(toaster.uuid));
        assert!(listed.iter().any(|listed_order| listed_order.uuid == first.uuid));

        Ok(())
    }
}
