//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - registration, login, profile
//! - [`products`] - catalog and seller product management
//! - [`orders`] - order lifecycle
//! - [`admin`] - user and product moderation

pub mod admin;
pub mod auth;
pub mod health;
pub mod orders;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
