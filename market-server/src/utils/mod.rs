//! Utility module - shared types and helpers
//!
//! - [`AppError`] / [`AppResult`] - application error type
//! - [`ApiResponse`] - API response envelope
//! - Logging setup and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{ApiResponse, AppError, AppJson};
pub use error::{ok, ok_with_message};
pub use result::AppResult;
