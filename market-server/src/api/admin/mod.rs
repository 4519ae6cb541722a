//! Admin API module
//!
//! User and product moderation. The whole router sits behind the admin
//! middleware; the global auth middleware has already resolved the caller.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // User management
        .route("/users", get(handler::list_users))
        .route(
            "/users/{id}",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user),
        )
        .route("/users/{id}/verify", put(handler::verify_seller))
        .route("/users/{id}/unverify", put(handler::unverify_seller))
        // Product moderation
        .route("/products", get(handler::list_products))
        .route(
            "/products/{id}",
            get(handler::get_product).delete(handler::delete_product),
        )
        .route("/products/{id}/verify", put(handler::verify_product))
        .route("/products/{id}/unverify", put(handler::unverify_product))
        .layer(middleware::from_fn(require_admin))
}
