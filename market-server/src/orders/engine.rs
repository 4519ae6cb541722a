//! Order Engine
//!
//! Owns the order lifecycle: creation from cart contents (validation against
//! the catalog, stock reservation, snapshot persistence), the pay/deliver
//! transitions, and the read/list surfaces. Authorization decisions come
//! from [`super::policy`] with the requesting user always passed explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::auth::CurrentUser;
use crate::db::models::{
    Order, OrderDetail, OrderItem, OrderStatus, OrderSummary, PaymentConfirmation, PaymentMethod,
    Product, ShippingAddress, UserPublic, UserRef,
};
use crate::db::repository::{OrderRepository, ProductRepository, RepoError, UserRepository};
use crate::orders::error::OrderError;
use crate::orders::policy;
use crate::orders::pricing::{PriceBreakdown, PricingPolicy};

/// One cart line as submitted by the client. Only the product reference and
/// quantity are honored; name/price/image are snapshotted from the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product: String,
    pub quantity: i64,
}

/// Order creation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub items_price: f64,
    #[serde(default)]
    pub tax_price: f64,
    #[serde(default)]
    pub shipping_price: f64,
    #[serde(default)]
    pub total_price: f64,
}

#[derive(Clone)]
pub struct OrderEngine {
    db: Surreal<Db>,
    pricing: Arc<dyn PricingPolicy>,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>, pricing: Arc<dyn PricingPolicy>) -> Self {
        Self { db, pricing }
    }

    /// Create an order from cart contents.
    ///
    /// Every line is validated against the catalog before any stock moves;
    /// the first violation (in line order) aborts the whole creation. Stock
    /// is then reserved per line with an atomic conditional decrement, and
    /// already-taken reservations are released if a later line loses a race
    /// or persistence fails.
    pub async fn create(
        &self,
        buyer: &CurrentUser,
        req: CreateOrderRequest,
    ) -> Result<Order, OrderError> {
        if req.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let products = ProductRepository::new(self.db.clone());

        // Pre-check every line before touching stock
        let mut lines: Vec<(Product, i64)> = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let product = products
                .find_by_id(&item.product)
                .await?
                .ok_or_else(|| OrderError::ProductNotFound(item.product.clone()))?;
            if item.quantity < 1 {
                return Err(OrderError::InvalidQuantity(product.name.clone()));
            }
            if product.stock < item.quantity {
                return Err(OrderError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.stock,
                    requested: item.quantity,
                });
            }
            lines.push((product, item.quantity));
        }

        // Seller comes from the catalog record of the first line; carts that
        // span sellers are rejected (one seller per order)
        let seller = lines[0].0.seller.clone();
        if lines.iter().any(|(p, _)| p.seller != seller) {
            return Err(OrderError::MixedSellers);
        }

        // Snapshot the lines from current catalog state
        let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
        for (product, quantity) in &lines {
            let product_id = product.id.clone().ok_or_else(|| {
                OrderError::Repo(RepoError::Database("product record missing id".to_string()))
            })?;
            items.push(OrderItem {
                product: product_id,
                name: product.name.clone(),
                quantity: *quantity,
                price: product.price,
                image: product.images.first().cloned(),
            });
        }

        let prices = self.pricing.price(
            &items,
            PriceBreakdown {
                items_price: req.items_price,
                tax_price: req.tax_price,
                shipping_price: req.shipping_price,
                total_price: req.total_price,
            },
        );

        // Reserve stock line by line; release everything taken so far on the
        // first failure
        let mut reserved: Vec<(RecordId, i64)> = Vec::with_capacity(items.len());
        for item in &items {
            match products.reserve_stock(&item.product, item.quantity).await {
                Ok(Some(_)) => reserved.push((item.product.clone(), item.quantity)),
                Ok(None) => {
                    self.release_reservations(&products, &reserved).await;
                    let available = products
                        .find_by_id(&item.product.to_string())
                        .await
                        .ok()
                        .flatten()
                        .map(|p| p.stock)
                        .unwrap_or(0);
                    return Err(OrderError::InsufficientStock {
                        name: item.name.clone(),
                        available,
                        requested: item.quantity,
                    });
                }
                Err(e) => {
                    self.release_reservations(&products, &reserved).await;
                    return Err(e.into());
                }
            }
        }

        let buyer_id: RecordId = buyer.id.parse().map_err(|_| {
            OrderError::Repo(RepoError::Database(format!(
                "invalid buyer id: {}",
                buyer.id
            )))
        })?;

        let now = Utc::now();
        let order = Order {
            id: None,
            buyer: buyer_id,
            seller,
            items,
            shipping_address: req.shipping_address,
            payment_method: req.payment_method,
            items_price: prices.items_price,
            tax_price: prices.tax_price,
            shipping_price: prices.shipping_price,
            total_price: prices.total_price,
            currency: "INR".to_string(),
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            payment_confirmation: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        let orders = OrderRepository::new(self.db.clone());
        match orders.create(order).await {
            Ok(created) => {
                tracing::info!(
                    order_id = %created.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
                    buyer = %buyer.id,
                    seller = %created.seller,
                    lines = created.items.len(),
                    total = created.total_price,
                    "Order created"
                );
                Ok(created)
            }
            Err(e) => {
                self.release_reservations(&products, &reserved).await;
                Err(e.into())
            }
        }
    }

    async fn release_reservations(
        &self,
        products: &ProductRepository,
        reserved: &[(RecordId, i64)],
    ) {
        for (product_id, quantity) in reserved {
            if let Err(e) = products.release_stock(product_id, *quantity).await {
                tracing::error!(
                    product = %product_id,
                    quantity,
                    error = %e,
                    "Failed to release reserved stock"
                );
            }
        }
    }

    /// Single-order read, gated by the access policy; buyer and seller are
    /// resolved to minimal public profiles.
    pub async fn get(
        &self,
        order_id: &str,
        user: &CurrentUser,
    ) -> Result<OrderDetail, OrderError> {
        let orders = OrderRepository::new(self.db.clone());
        let order = orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !policy::can_access(&order, user) {
            return Err(OrderError::Forbidden("Not authorized to access this order"));
        }

        let users = UserRepository::new(self.db.clone());
        let buyer = self.resolve_public(&users, &order.buyer).await?;
        let seller = self.resolve_public(&users, &order.seller).await?;

        Ok(OrderDetail::from_order(order, buyer, seller))
    }

    async fn resolve_public(
        &self,
        users: &UserRepository,
        id: &RecordId,
    ) -> Result<UserPublic, OrderError> {
        let user = users.find_by_id(&id.to_string()).await?;
        // Orders outlive deleted accounts; fall back to the bare reference
        Ok(user.as_ref().map(UserPublic::from).unwrap_or(UserPublic {
            id: id.to_string(),
            name: String::new(),
            email: String::new(),
        }))
    }

    /// Mark an order paid, storing the confirmation payload verbatim.
    ///
    /// Any authenticated caller holding the order id may confirm payment
    /// (deliberately permissive, see DESIGN.md). The flag is a one-way
    /// switch; re-invoking only re-stamps `paidAt`.
    pub async fn pay(
        &self,
        order_id: &str,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, OrderError> {
        let orders = OrderRepository::new(self.db.clone());
        let updated = orders
            .mark_paid(order_id, confirmation)
            .await?
            .ok_or(OrderError::NotFound)?;
        tracing::info!(order_id = %order_id, "Order marked paid");
        Ok(updated)
    }

    /// Mark an order delivered. Only the order's seller or an admin may do
    /// this; the flag is a one-way switch.
    pub async fn deliver(
        &self,
        order_id: &str,
        user: &CurrentUser,
    ) -> Result<Order, OrderError> {
        let orders = OrderRepository::new(self.db.clone());
        let order = orders
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !policy::can_deliver(&order, user) {
            return Err(OrderError::Forbidden(
                "Not authorized to deliver this order",
            ));
        }

        let updated = orders
            .mark_delivered(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;
        tracing::info!(order_id = %order_id, by = %user.id, "Order marked delivered");
        Ok(updated)
    }

    /// The requester's purchases, newest first
    pub async fn orders_for_buyer(&self, user: &CurrentUser) -> Result<Vec<Order>, OrderError> {
        let orders = OrderRepository::new(self.db.clone());
        Ok(orders.find_by_buyer(&user.id).await?)
    }

    /// The requester's sales, newest first
    pub async fn orders_for_seller(&self, user: &CurrentUser) -> Result<Vec<Order>, OrderError> {
        let orders = OrderRepository::new(self.db.clone());
        Ok(orders.find_by_seller(&user.id).await?)
    }

    /// Every order with buyer/seller narrowed to `{id, name}` (admin triage)
    pub async fn all_orders(&self) -> Result<Vec<OrderSummary>, OrderError> {
        let orders = OrderRepository::new(self.db.clone());
        let users = UserRepository::new(self.db.clone());
        let all = orders.find_all().await?;

        // Resolve each referenced user once
        let mut refs: HashMap<String, UserRef> = HashMap::new();
        for order in &all {
            for id in [&order.buyer, &order.seller] {
                let key = id.to_string();
                if !refs.contains_key(&key) {
                    let user = users.find_by_id(&key).await?;
                    let user_ref = user.as_ref().map(UserRef::from).unwrap_or(UserRef {
                        id: key.clone(),
                        name: String::new(),
                    });
                    refs.insert(key, user_ref);
                }
            }
        }

        Ok(all
            .iter()
            .map(|order| {
                let buyer = refs
                    .get(&order.buyer.to_string())
                    .cloned()
                    .unwrap_or(UserRef {
                        id: order.buyer.to_string(),
                        name: String::new(),
                    });
                let seller = refs
                    .get(&order.seller.to_string())
                    .cloned()
                    .unwrap_or(UserRef {
                        id: order.seller.to_string(),
                        name: String::new(),
                    });
                OrderSummary::from_order(order, buyer, seller)
            })
            .collect())
    }
}
