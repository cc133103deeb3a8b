//! Products service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, NewVariant, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid, VariantRecord},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

/// Attach each variant to the product it belongs to, keeping variant order.
fn attach_variants(products: &mut [ProductRecord], variants: Vec<VariantRecord>) {
    let mut by_product: FxHashMap<ProductUuid, Vec<VariantRecord>> = FxHashMap::default();

    for variant in variants {
        by_product
            .entry(variant.product_uuid)
            .or_default()
            .push(variant);
    }

    for product in products {
        product.variants = by_product.remove(&product.uuid).unwrap_or_default();
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut products = self
            .repository
            .list_products(&mut tx, include_inactive)
            .await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|product| product.uuid).collect();

        let variants = self
            .repository
            .list_variants(&mut tx, &uuids, include_inactive)
            .await?;

        tx.commit().await?;

        attach_variants(&mut products, variants);

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
        include_inactive: bool,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut product = self
            .repository
            .get_product(&mut tx, product, include_inactive)
            .await?;

        product.variants = self
            .repository
            .list_variants(&mut tx, &[product.uuid], include_inactive)
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.name.trim().is_empty() || product.slug.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut updated = self
            .repository
            .update_product(&mut tx, product, update)
            .await?;

        updated.variants = self
            .repository
            .list_variants(&mut tx, &[product], true)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "products.service.create_variant",
        skip(self, variant),
        fields(product_uuid = %product, variant_uuid = %variant.uuid),
        err
    )]
    async fn create_variant(
        &self,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<VariantRecord, ProductsServiceError> {
        if variant.name.trim().is_empty() || variant.sku.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_variant(&mut tx, product, variant)
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves products with their variants; inactive ones only when asked.
    async fn list_products(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product with its variants.
    async fn get_product(
        &self,
        product: ProductUuid,
        include_inactive: bool,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Creates a new catalog product.
    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, ProductsServiceError>;

    /// Changes price, stock or the active flag of a product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Adds a variant to an existing product.
    async fn create_variant(
        &self,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<VariantRecord, ProductsServiceError>;
}
