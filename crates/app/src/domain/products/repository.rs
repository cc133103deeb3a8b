//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{
        amount_param, count_param, try_get_amount, try_get_count, try_get_optional_amount,
        try_get_optional_count,
    },
    domain::products::{
        data::{NewProduct, NewVariant, ProductUpdate},
        models::Purchasable,
        records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
    },
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const LIST_VARIANTS_SQL: &str = include_str!("sql/list_variants.sql");
const CREATE_VARIANT_SQL: &str = include_str!("sql/create_variant.sql");
const FIND_PURCHASABLE_SQL: &str = include_str!("sql/find_purchasable.sql");
const DECREMENT_PRODUCT_STOCK_SQL: &str = include_str!("sql/decrement_product_stock.sql");
const DECREMENT_VARIANT_STOCK_SQL: &str = include_str!("sql/decrement_variant_stock.sql");
const INCREMENT_PRODUCT_STOCK_SQL: &str = include_str!("sql/increment_product_stock.sql");
const INCREMENT_VARIANT_STOCK_SQL: &str = include_str!("sql/increment_variant_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        include_inactive: bool,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(include_inactive)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        include_inactive: bool,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(include_inactive)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(product.slug)
            .bind(product.image_url)
            .bind(product.category)
            .bind(product.brand)
            .bind(amount_param("price", product.price)?)
            .bind(count_param("stock", product.stock)?)
            .bind(product.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = update
            .price
            .map(|price| amount_param("price", price))
            .transpose()?;

        let stock = update
            .stock
            .map(|stock| count_param("stock", stock))
            .transpose()?;

        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(price)
            .bind(stock)
            .bind(update.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
        include_inactive: bool,
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        query_as::<Postgres, VariantRecord>(LIST_VARIANTS_SQL)
            .bind(uuids)
            .bind(include_inactive)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<VariantRecord, sqlx::Error> {
        let price = variant
            .price
            .map(|price| amount_param("price", price))
            .transpose()?;

        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(variant.name)
            .bind(variant.sku)
            .bind(price)
            .bind(count_param("stock", variant.stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Resolve a product and optional variant into a purchasable line.
    ///
    /// Returns `None` when the product does not exist, or a variant was
    /// requested that does not belong to it.
    pub(crate) async fn find_purchasable(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: Option<VariantUuid>,
    ) -> Result<Option<Purchasable>, sqlx::Error> {
        let row = query(FIND_PURCHASABLE_SQL)
            .bind(product.into_uuid())
            .bind(variant.map(VariantUuid::into_uuid))
            .fetch_optional(&mut **tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variant_uuid: Option<Uuid> = row.try_get("variant_uuid")?;

        if variant.is_some() && variant_uuid.is_none() {
            return Ok(None);
        }

        let product_price = try_get_amount(&row, "product_price")?;
        let product_stock = try_get_count(&row, "product_stock")?;
        let product_active: bool = row.try_get("product_active")?;

        let variant_price = try_get_optional_amount(&row, "variant_price")?;
        let variant_stock = try_get_optional_count(&row, "variant_stock")?;
        let variant_active: Option<bool> = row.try_get("variant_active")?;

        Ok(Some(Purchasable {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_uuid: variant_uuid.map(VariantUuid::from_uuid),
            name: row.try_get("name")?,
            variant_name: row.try_get("variant_name")?,
            image_url: row.try_get("image_url")?,
            category: row.try_get("category")?,
            brand: row.try_get("brand")?,
            unit_price: variant_price.unwrap_or(product_price),
            stock: variant_stock.unwrap_or(product_stock),
            is_active: product_active && variant_active.unwrap_or(true),
        }))
    }

    /// Take `quantity` units out of stock. Returns `false` when stock is insufficient.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: Option<VariantUuid>,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        let (sql, uuid) = match variant {
            Some(variant) => (DECREMENT_VARIANT_STOCK_SQL, variant.into_uuid()),
            None => (DECREMENT_PRODUCT_STOCK_SQL, product.into_uuid()),
        };

        let rows_affected = query(sql)
            .bind(uuid)
            .bind(count_param("quantity", quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn increment_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: Option<VariantUuid>,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let (sql, uuid) = match variant {
            Some(variant) => (INCREMENT_VARIANT_STOCK_SQL, variant.into_uuid()),
            None => (INCREMENT_PRODUCT_STOCK_SQL, product.into_uuid()),
        };

        let rows_affected = query(sql)
            .bind(uuid)
            .bind(count_param("quantity", quantity)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            image_url: row.try_get("image_url")?,
            category: row.try_get("category")?,
            brand: row.try_get("brand")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            is_active: row.try_get("is_active")?,
            variants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            sku: row.try_get("sku")?,
            price: try_get_optional_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
