//! Database Models

// Serde helpers
pub mod serde_helpers;

// Identity
pub mod user;

// Catalog
pub mod product;

// Orders
pub mod order;

// Re-exports
pub use user::{Role, User, UserId, UserPublic, UserRef, UserResponse, UserUpdate};
pub use product::{Category, Product, ProductCreate, ProductDetail, ProductId, ProductUpdate};
pub use order::{
    Order, OrderDetail, OrderId, OrderItem, OrderStatus, OrderSummary,
    PaymentConfirmation, PaymentMethod, ShippingAddress,
};
