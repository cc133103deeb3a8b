//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            models::Cart,
            records::CartItemRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
            validation::validate_cart_lines,
        },
        coupons::{
            data::NewCoupon,
            errors::CouponsServiceError,
            evaluation::{CouponEvaluation, EligibleLine, ShopperHistory, evaluate},
            records::{CouponRecord, CouponUuid, DiscountType},
            repository::PgCouponsRepository,
        },
        users::records::UserUuid,
    },
};

/// Result of checking a code against the shopper's current cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponPreview {
    pub code: String,
    pub can_apply: bool,
    pub reason: Option<String>,
    pub subtotal: u64,
    pub discount: u64,
}

/// A coupon found by code and evaluated for one shopper's lines.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCoupon {
    pub coupon: CouponRecord,
    pub evaluation: CouponEvaluation,
}

/// Look `code` up and evaluate it against `items` for `user`.
///
/// Returns `None` when no coupon has that code.
pub(crate) async fn resolve_coupon(
    tx: &mut Transaction<'_, Postgres>,
    repository: &PgCouponsRepository,
    user: UserUuid,
    code: &str,
    items: &[CartItemRecord],
    now: Timestamp,
) -> Result<Option<ResolvedCoupon>, sqlx::Error> {
    let Some(coupon) = repository.find_by_code(tx, code.trim()).await? else {
        return Ok(None);
    };

    let history = ShopperHistory {
        order_count: repository.count_user_orders(tx, user).await?,
        redemptions: repository
            .count_user_redemptions(tx, coupon.uuid, user)
            .await?,
    };

    let evaluation = evaluate(&coupon, items.iter().map(EligibleLine::from), history, now);

    Ok(Some(ResolvedCoupon { coupon, evaluation }))
}

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

fn check_new_coupon(coupon: &NewCoupon) -> Result<(), CouponsServiceError> {
    if coupon.code.trim().is_empty() {
        return Err(CouponsServiceError::MissingRequiredData);
    }

    if coupon.discount_type == DiscountType::Percentage && coupon.discount_value > 100 {
        return Err(CouponsServiceError::InvalidData);
    }

    if let (Some(min), Some(max)) = (coupon.min_order_value, coupon.max_order_value)
        && min > max
    {
        return Err(CouponsServiceError::InvalidData);
    }

    if let (Some(starts_at), Some(expires_at)) = (coupon.starts_at, coupon.expires_at)
        && starts_at >= expires_at
    {
        return Err(CouponsServiceError::InvalidData);
    }

    if coupon.audience.new_users_only && coupon.audience.existing_users_only {
        return Err(CouponsServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn validate_coupon(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<CouponPreview, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let (cart, cart_errors) = match self.carts_repository.lock_cart(&mut tx, user).await? {
            Some(cart_uuid) => {
                let cart = Cart {
                    uuid: Some(cart_uuid),
                    user_uuid: user,
                    items: self.items_repository.list_items(&mut tx, cart_uuid).await?,
                };

                if cart.is_empty() {
                    (cart, Vec::new())
                } else {
                    // Same refresh checkout runs, so the preview prices what would be ordered.
                    let validation = validate_cart_lines(&mut tx, cart_uuid, cart).await?;

                    (validation.cart, validation.errors)
                }
            }
            None => (Cart::empty(user), Vec::new()),
        };

        let resolved = resolve_coupon(
            &mut tx,
            &self.repository,
            user,
            code,
            &cart.items,
            Timestamp::now(),
        )
        .await?
        .ok_or(CouponsServiceError::NotFound)?;

        tx.commit().await?;

        let subtotal = cart.subtotal();

        if !cart_errors.is_empty() {
            return Ok(CouponPreview {
                code: resolved.coupon.code,
                can_apply: false,
                reason: Some(cart_errors.join("; ")),
                subtotal,
                discount: 0,
            });
        }

        Ok(CouponPreview {
            code: resolved.coupon.code,
            can_apply: resolved.evaluation.check.can_apply,
            reason: resolved.evaluation.check.reason,
            subtotal,
            discount: resolved.evaluation.discount,
        })
    }

    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(coupon_uuid = %coupon.uuid),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        check_new_coupon(&coupon)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn deactivate_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.deactivate_coupon(&mut tx, coupon).await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Preview what a code would do to the shopper's current cart.
    async fn validate_coupon(
        &self,
        user: UserUuid,
        code: &str,
    ) -> Result<CouponPreview, CouponsServiceError>;

    /// Creates a new coupon.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieves all coupons, newest first.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Stops a coupon from being applied to new orders.
    async fn deactivate_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError>;
}
