//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{
        amount_param, count_param, try_get_amount, try_get_count, try_get_optional_amount,
        try_get_optional_count,
    },
    domain::{
        coupons::{
            data::NewCoupon,
            records::{Applicability, Audience, CouponRecord, CouponUuid, DiscountType},
        },
        orders::records::OrderUuid,
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const FIND_COUPON_BY_CODE_SQL: &str = include_str!("sql/find_coupon_by_code.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const DEACTIVATE_COUPON_SQL: &str = include_str!("sql/deactivate_coupon.sql");
const INCREMENT_COUPON_USAGE_SQL: &str = include_str!("sql/increment_coupon_usage.sql");
const COUNT_USER_REDEMPTIONS_SQL: &str = include_str!("sql/count_user_redemptions.sql");
const CREATE_REDEMPTION_SQL: &str = include_str!("sql/create_redemption.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("sql/count_user_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Look a coupon up by code, ignoring case.
    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(FIND_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let optional_amount = |col: &str, amount: Option<u64>| {
            amount.map(|amount| amount_param(col, amount)).transpose()
        };

        let optional_count = |col: &str, count: Option<u32>| {
            count.map(|count| count_param(col, count)).transpose()
        };

        let products = |uuids: &[ProductUuid]| -> Vec<Uuid> {
            uuids.iter().map(|uuid| uuid.into_uuid()).collect()
        };

        let applicability = &coupon.applicability;

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(&coupon.description)
            .bind(coupon.discount_type.as_str())
            .bind(amount_param("discount_value", coupon.discount_value)?)
            .bind(optional_amount("max_discount", coupon.max_discount)?)
            .bind(optional_amount("min_order_value", coupon.min_order_value)?)
            .bind(optional_amount("max_order_value", coupon.max_order_value)?)
            .bind(coupon.starts_at.map(SqlxTimestamp::from))
            .bind(coupon.expires_at.map(SqlxTimestamp::from))
            .bind(optional_count("usage_limit", coupon.usage_limit)?)
            .bind(optional_count("per_user_limit", coupon.per_user_limit)?)
            .bind(coupon.audience.new_users_only)
            .bind(coupon.audience.existing_users_only)
            .bind(coupon.audience.first_order_only)
            .bind(optional_count(
                "min_previous_orders",
                coupon.audience.min_previous_orders,
            )?)
            .bind(products(&applicability.include_products))
            .bind(products(&applicability.exclude_products))
            .bind(&applicability.include_categories)
            .bind(&applicability.exclude_categories)
            .bind(&applicability.include_brands)
            .bind(&applicability.exclude_brands)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn deactivate_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DEACTIVATE_COUPON_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Count one more use. Returns `false` when the usage limit is already reached.
    pub(crate) async fn increment_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(INCREMENT_COUPON_USAGE_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn count_user_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_REDEMPTIONS_SQL)
            .bind(coupon.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }

    pub(crate) async fn create_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_REDEMPTION_SQL)
            .bind(coupon.into_uuid())
            .bind(user.into_uuid())
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Orders the user has placed that were not cancelled.
    pub(crate) async fn count_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.unsigned_abs())
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;

        let discount_type =
            discount_type
                .parse::<DiscountType>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "discount_type".to_string(),
                    source: Box::new(e),
                })?;

        let products = |col: &str| -> sqlx::Result<Vec<ProductUuid>> {
            let uuids: Vec<Uuid> = row.try_get(col)?;

            Ok(uuids.into_iter().map(ProductUuid::from_uuid).collect())
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            discount_type,
            discount_value: try_get_amount(row, "discount_value")?,
            max_discount: try_get_optional_amount(row, "max_discount")?,
            min_order_value: try_get_optional_amount(row, "min_order_value")?,
            max_order_value: try_get_optional_amount(row, "max_order_value")?,
            starts_at: row
                .try_get::<Option<SqlxTimestamp>, _>("starts_at")?
                .map(SqlxTimestamp::to_jiff),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            usage_limit: try_get_optional_count(row, "usage_limit")?,
            used_count: try_get_count(row, "used_count")?,
            per_user_limit: try_get_optional_count(row, "per_user_limit")?,
            audience: Audience {
                new_users_only: row.try_get("new_users_only")?,
                existing_users_only: row.try_get("existing_users_only")?,
                first_order_only: row.try_get("first_order_only")?,
                min_previous_orders: try_get_optional_count(row, "min_previous_orders")?,
            },
            applicability: Applicability {
                include_products: products("include_products")?,
                exclude_products: products("exclude_products")?,
                include_categories: row.try_get("include_categories")?,
                exclude_categories: row.try_get("exclude_categories")?,
                include_brands: row.try_get("include_brands")?,
                exclude_brands: row.try_get("exclude_brands")?,
            },
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
