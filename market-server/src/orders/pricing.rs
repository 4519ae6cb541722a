//! Pricing policy
//!
//! The money fields on an order (`itemsPrice`/`taxPrice`/`shippingPrice`/
//! `totalPrice`) are accepted from the client, but they flow through this
//! collaborator so a server-side calculator can be substituted without
//! touching the order engine contract.

use crate::db::models::OrderItem;

/// Money fields of an order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
}

/// Decides the final prices for an order given the snapshot lines and the
/// client-submitted totals.
pub trait PricingPolicy: Send + Sync + std::fmt::Debug {
    fn price(&self, items: &[OrderItem], submitted: PriceBreakdown) -> PriceBreakdown;
}

/// Default policy: totals are trusted as submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustClientPricing;

impl PricingPolicy for TrustClientPricing {
    fn price(&self, _items: &[OrderItem], submitted: PriceBreakdown) -> PriceBreakdown {
        submitted
    }
}
