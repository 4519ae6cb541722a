//! Order Repository
//!
//! Persistence for orders. The payment/delivery flags only ever move from
//! false to true here; there is no reverse operation.

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Order, PaymentConfirmation};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id ("order:abc" or bare key); malformed ids simply match
    /// nothing
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = strip_table_prefix(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, key)).await?;
        Ok(order)
    }

    /// A buyer's orders, newest first
    pub async fn find_by_buyer(&self, buyer_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE buyer = $buyer ORDER BY createdAt DESC")
            .bind(("buyer", buyer_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// A seller's orders, newest first
    pub async fn find_by_seller(&self, seller_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE seller = $seller ORDER BY createdAt DESC")
            .bind(("seller", seller_id.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Every order, newest first (admin)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Mark paid and store the confirmation payload verbatim. Idempotent in
    /// effect: re-invoking re-stamps `paidAt` and overwrites the confirmation.
    pub async fn mark_paid(
        &self,
        id: &str,
        confirmation: PaymentConfirmation,
    ) -> RepoResult<Option<Order>> {
        let key = strip_table_prefix(ORDER_TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing('order', $key) \
                 SET isPaid = true, paidAt = $now, paymentConfirmation = $confirmation, \
                     updatedAt = $now \
                 RETURN AFTER",
            )
            .bind(("key", key))
            .bind(("confirmation", confirmation))
            .bind(("now", Utc::now()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Mark delivered. Idempotent in effect: re-invoking re-stamps
    /// `deliveredAt`.
    pub async fn mark_delivered(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = strip_table_prefix(ORDER_TABLE, id).to_string();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::thing('order', $key) \
                 SET isDelivered = true, deliveredAt = $now, updatedAt = $now \
                 RETURN AFTER",
            )
            .bind(("key", key))
            .bind(("now", Utc::now()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}
