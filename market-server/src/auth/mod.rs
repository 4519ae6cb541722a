//! Authentication and authorization
//!
//! JWT issue/validation, the request auth middleware (which re-resolves the
//! account per request) and the `CurrentUser` extractor.

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{CurrentUser, ensure_role, require_admin, require_auth};
