//! Order Model
//!
//! The central entity of the marketplace. An order freezes a snapshot of the
//! purchased items at checkout time; buyer and seller are set once at
//! creation and never change. Payment and delivery are one-way boolean
//! flags, tracked independently from the lifecycle `status` enum.

use super::serde_helpers;
use super::user::{UserPublic, UserRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Lifecycle status. Defaults to `Pending` at creation; nothing in this API
/// advances it programmatically — `is_paid`/`is_delivered` move on their own
/// track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    NetBanking,
    Upi,
    Wallet,
}

/// Line snapshot: name/price frozen at purchase time, never resynced with
/// later catalog edits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

/// Structured shipping address, required at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub port: String,
}

/// Payment confirmation captured verbatim from the pay request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub payer_email: String,
}

/// Order entity matching the `order` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub buyer: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_confirmation: Option<PaymentConfirmation>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "INR".to_string()
}

// =============================================================================
// API Response Types
// =============================================================================

/// Single-order read: buyer and seller resolved to minimal public profiles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: String,
    pub buyer: UserPublic,
    pub seller: UserPublic,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
    pub currency: String,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_confirmation: Option<PaymentConfirmation>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetail {
    pub fn from_order(order: Order, buyer: UserPublic, seller: UserPublic) -> Self {
        Self {
            id: order.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            buyer,
            seller,
            items: order.items,
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            items_price: order.items_price,
            tax_price: order.tax_price,
            shipping_price: order.shipping_price,
            total_price: order.total_price,
            currency: order.currency,
            status: order.status,
            is_paid: order.is_paid,
            paid_at: order.paid_at,
            payment_confirmation: order.payment_confirmation,
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Admin all-orders listing entry: buyer/seller narrowed to `{id, name}`
/// (triage view, not detail)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: String,
    pub buyer: UserRef,
    pub seller: UserRef,
    pub total_price: f64,
    pub currency: String,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub is_delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    pub fn from_order(order: &Order, buyer: UserRef, seller: UserRef) -> Self {
        Self {
            id: order.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            buyer,
            seller,
            total_price: order.total_price,
            currency: order.currency.clone(),
            status: order.status,
            is_paid: order.is_paid,
            is_delivered: order.is_delivered,
            created_at: order.created_at,
        }
    }
}
