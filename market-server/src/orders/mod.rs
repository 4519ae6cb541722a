//! Order domain
//!
//! The order lifecycle and its authorization model, kept separate from the
//! HTTP layer in `api/orders`:
//!
//! - [`engine`]: creation (catalog validation, stock reservation, snapshot
//!   persistence), pay/deliver transitions, read/list surfaces
//! - [`policy`]: pure access decisions, applied with the requesting user as
//!   an explicit parameter
//! - [`pricing`]: injectable pricing collaborator
//! - [`error`]: domain error taxonomy

pub mod engine;
pub mod error;
pub mod policy;
pub mod pricing;

#[cfg(test)]
mod tests;

pub use engine::{CreateOrderRequest, OrderEngine, OrderItemInput};
pub use error::OrderError;
pub use pricing::{PriceBreakdown, PricingPolicy, TrustClientPricing};
