//! Order engine errors

use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Failures of order operations, translated into HTTP responses at the API
/// boundary
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("No order items")]
    EmptyOrder,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock for {name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    #[error("Quantity must be at least 1 for {0}")]
    InvalidQuantity(String),

    #[error("All order items must belong to the same seller")]
    MixedSellers,

    #[error("Order not found")]
    NotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            e @ (OrderError::EmptyOrder
            | OrderError::InvalidQuantity(_)
            | OrderError::MixedSellers
            | OrderError::InsufficientStock { .. }) => AppError::validation(e.to_string()),
            e @ OrderError::ProductNotFound(_) => AppError::not_found(e.to_string()),
            OrderError::NotFound => AppError::not_found("Order not found"),
            OrderError::Forbidden(msg) => AppError::forbidden(msg),
            OrderError::Repo(e) => e.into(),
        }
    }
}
