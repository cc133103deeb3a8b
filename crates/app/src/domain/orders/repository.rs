//! Orders Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_param, count_param, try_get_amount, try_get_count},
    domain::{
        addresses::records::AddressUuid,
        coupons::records::CouponUuid,
        orders::{
            pricing::OrderTotals,
            records::{
                OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid, StatusHistoryRecord,
                StatusHistoryUuid,
            },
            status::{OrderStatus, PaymentMethod, PaymentStatus},
        },
        products::records::{ProductUuid, VariantUuid},
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const FIND_ORDER_SQL: &str = include_str!("sql/find_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const LIST_ALL_ORDERS_SQL: &str = include_str!("sql/list_all_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const CANCEL_ORDER_SQL: &str = include_str!("sql/cancel_order.sql");
const SET_GATEWAY_ORDER_SQL: &str = include_str!("sql/set_gateway_order.sql");
const MARK_ORDER_PAID_SQL: &str = include_str!("sql/mark_order_paid.sql");
const LIST_STATUS_HISTORY_SQL: &str = include_str!("sql/list_status_history.sql");

/// Everything needed to insert an order row.
#[derive(Debug, Clone)]
pub(crate) struct OrderDraft {
    pub uuid: OrderUuid,
    pub order_number: String,
    pub user_uuid: UserUuid,
    pub shipping_address_uuid: AddressUuid,
    pub billing_address_uuid: AddressUuid,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    pub coupon: Option<(CouponUuid, String)>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        draft: OrderDraft,
    ) -> Result<OrderRecord, sqlx::Error> {
        let (coupon_uuid, coupon_code) = draft.coupon.unzip();
        let totals = draft.totals;

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(draft.uuid.into_uuid())
            .bind(draft.order_number)
            .bind(draft.user_uuid.into_uuid())
            .bind(draft.shipping_address_uuid.into_uuid())
            .bind(draft.billing_address_uuid.into_uuid())
            .bind(draft.payment_method.as_str())
            .bind(amount_param("subtotal", totals.subtotal)?)
            .bind(amount_param("discount", totals.discount)?)
            .bind(amount_param("tax", totals.tax)?)
            .bind(amount_param("shipping", totals.shipping)?)
            .bind(amount_param("total", totals.total)?)
            .bind(coupon_uuid.map(CouponUuid::into_uuid))
            .bind(coupon_code)
            .bind(draft.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[OrderItemRecord],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|e| sqlx::Error::Encode(format!("position: {e}").into()))?;

            query(CREATE_ORDER_ITEM_SQL)
                .bind(item.uuid.into_uuid())
                .bind(item.order_uuid.into_uuid())
                .bind(item.product_uuid.into_uuid())
                .bind(item.variant_uuid.map(VariantUuid::into_uuid))
                .bind(&item.name)
                .bind(&item.variant_name)
                .bind(&item.image_url)
                .bind(amount_param("unit_price", item.unit_price)?)
                .bind(count_param("quantity", item.quantity)?)
                .bind(amount_param("line_total", item.line_total)?)
                .bind(position)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Fill in `items` for each order.
    pub(crate) async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        if orders.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let items = query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in items {
            by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in orders {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }

    /// Find an order, optionally restricted to one owner.
    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        owner: Option<UserUuid>,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(FIND_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.map(UserUuid::into_uuid))
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_order`], holding a row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        owner: Option<UserUuid>,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.map(UserUuid::into_uuid))
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_all_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ALL_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        stamp_delivered: bool,
        mark_paid: bool,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(stamp_delivered)
            .bind(mark_paid)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn cancel_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        reason: Option<&str>,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CANCEL_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(reason)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_gateway_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        gateway_order_id: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_GATEWAY_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(gateway_order_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Record a verified payment and confirm the order.
    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        gateway_payment_id: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(MARK_ORDER_PAID_SQL)
            .bind(order.into_uuid())
            .bind(gateway_payment_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<StatusHistoryRecord>, sqlx::Error> {
        query_as::<Postgres, StatusHistoryRecord>(LIST_STATUS_HISTORY_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            shipping_address_uuid: AddressUuid::from_uuid(row.try_get("shipping_address_uuid")?),
            billing_address_uuid: AddressUuid::from_uuid(row.try_get("billing_address_uuid")?),
            payment_method: try_get_parsed::<PaymentMethod>(row, "payment_method")?,
            payment_status: try_get_parsed::<PaymentStatus>(row, "payment_status")?,
            status: try_get_parsed::<OrderStatus>(row, "status")?,
            totals: OrderTotals {
                subtotal: try_get_amount(row, "subtotal")?,
                discount: try_get_amount(row, "discount")?,
                tax: try_get_amount(row, "tax")?,
                shipping: try_get_amount(row, "shipping")?,
                total: try_get_amount(row, "total")?,
            },
            coupon_uuid: row
                .try_get::<Option<Uuid>, _>("coupon_uuid")?
                .map(CouponUuid::from_uuid),
            coupon_code: row.try_get("coupon_code")?,
            gateway_order_id: row.try_get("gateway_order_id")?,
            gateway_payment_id: row.try_get("gateway_payment_id")?,
            notes: row.try_get("notes")?,
            cancellation_reason: row.try_get("cancellation_reason")?,
            items: Vec::new(),
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            cancelled_at: row
                .try_get::<Option<SqlxTimestamp>, _>("cancelled_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_uuid: row
                .try_get::<Option<Uuid>, _>("variant_uuid")?
                .map(VariantUuid::from_uuid),
            name: row.try_get("name")?,
            variant_name: row.try_get("variant_name")?,
            image_url: row.try_get("image_url")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity: try_get_count(row, "quantity")?,
            line_total: try_get_amount(row, "line_total")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StatusHistoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let old_status = row
            .try_get::<Option<String>, _>("old_status")?
            .map(|status| status.parse::<OrderStatus>())
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "old_status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: StatusHistoryUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            old_status,
            new_status: try_get_parsed::<OrderStatus>(row, "new_status")?,
            actor_uuid: row
                .try_get::<Option<Uuid>, _>("actor_uuid")?
                .map(UserUuid::from_uuid),
            reason: row.try_get("reason")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
