//! Product Repository
//!
//! Catalog access plus the stock-reservation primitives used by order
//! creation. `reserve_stock` is a single conditional statement so two racing
//! checkouts cannot both consume the last units.

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Product, ProductUpdate};
use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products, newest first (public catalog)
    pub async fn find_all_active(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE isActive = true ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find all products including inactive ones (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id ("product:abc" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let key = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, key)).await?;
        Ok(product)
    }

    /// Find a seller's products, newest first
    pub async fn find_by_seller(&self, seller_id: &str) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE seller = $seller ORDER BY createdAt DESC")
            .bind(("seller", seller_id.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a new product
    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partial update
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let key = strip_table_prefix(PRODUCT_TABLE, id).to_string();

        let mut set_parts: Vec<&str> = vec!["updatedAt = $now"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.currency.is_some() {
            set_parts.push("currency = $currency");
        }
        if data.images.is_some() {
            set_parts.push("images = $images");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.tags.is_some() {
            set_parts.push("tags = $tags");
        }
        if data.is_active.is_some() {
            set_parts.push("isActive = $is_active");
        }

        let sql = format!(
            "UPDATE type::thing('product', $key) SET {} RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("key", key))
            .bind(("now", Utc::now()));
        if let Some(name) = data.name {
            query = query.bind(("name", name));
        }
        if let Some(description) = data.description {
            query = query.bind(("description", description));
        }
        if let Some(category) = data.category {
            query = query.bind(("category", category));
        }
        if let Some(price) = data.price {
            query = query.bind(("price", price));
        }
        if let Some(currency) = data.currency {
            query = query.bind(("currency", currency));
        }
        if let Some(images) = data.images {
            query = query.bind(("images", images));
        }
        if let Some(stock) = data.stock {
            query = query.bind(("stock", stock));
        }
        if let Some(tags) = data.tags {
            query = query.bind(("tags", tags));
        }
        if let Some(is_active) = data.is_active {
            query = query.bind(("is_active", is_active));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Set the admin verification flag
    pub async fn set_verified(&self, id: &str, verified: bool) -> RepoResult<Product> {
        let key = strip_table_prefix(PRODUCT_TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing('product', $key) SET isVerified = $verified, updatedAt = $now RETURN AFTER",
            )
            .bind(("key", key))
            .bind(("verified", verified))
            .bind(("now", Utc::now()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Delete a product, returning whether it existed
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let key = strip_table_prefix(PRODUCT_TABLE, id);
        let deleted: Option<Product> = self.base.db().delete((PRODUCT_TABLE, key)).await?;
        Ok(deleted.is_some())
    }

    /// Atomically reserve stock: decrement by `quantity` only if enough is
    /// available. Returns the updated product, or `None` when the conditional
    /// update matched no row (raced away or out of stock).
    pub async fn reserve_stock(
        &self,
        product_id: &RecordId,
        quantity: i64,
    ) -> RepoResult<Option<Product>> {
        let key = product_id.key().to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing('product', $key) \
                 SET stock = stock - $qty, updatedAt = $now \
                 WHERE stock >= $qty RETURN AFTER",
            )
            .bind(("key", key))
            .bind(("qty", quantity))
            .bind(("now", Utc::now()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Compensating increment for a reservation that has to be undone
    pub async fn release_stock(&self, product_id: &RecordId, quantity: i64) -> RepoResult<()> {
        let key = product_id.key().to_string();
        self.base
            .db()
            .query(
                "UPDATE type::thing('product', $key) \
                 SET stock = stock + $qty, updatedAt = $now",
            )
            .bind(("key", key))
            .bind(("qty", quantity))
            .bind(("now", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }
}
