//! Product Model
//!
//! Catalog entries are port/logistics services sold by sellers. The order
//! engine reads `stock`/`seller` from here and decrements stock on checkout.

use super::serde_helpers;
use super::user::UserPublic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Service categories offered on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PortServices,
    CustomsClearance,
    ContainerHandling,
    FreightForwarding,
    Warehousing,
    Logistics,
    Documentation,
    Insurance,
    Other,
}

/// Product model matching the `product` table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(with = "serde_helpers::record_id")]
    pub seller: RecordId,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Create product payload (seller comes from the authenticated requester)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Partial update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub images: Option<Vec<String>>,
    pub stock: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Product with its seller resolved to a public profile (detail views)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub seller_profile: UserPublic,
}
