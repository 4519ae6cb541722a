//! Order API module
//!
//! All routes require authentication (global middleware). Role and ownership
//! gates are applied per operation: the admin listing shares its path with
//! order creation, and deliver needs the order loaded before its seller can
//! be checked, so both live with the handlers/engine rather than in route
//! middleware.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_all).post(handler::create))
        .route("/myorders", get(handler::my_orders))
        .route("/mysellerorders", get(handler::my_seller_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/pay", put(handler::pay))
        .route("/{id}/deliver", put(handler::deliver))
}
