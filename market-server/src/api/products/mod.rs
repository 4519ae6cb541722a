//! Product API module
//!
//! Catalog reads are public; creation and management are seller-only and
//! ownership-checked in the handlers (the manage routes share paths with the
//! public reads, so the gate lives next to the ownership check rather than
//! in route middleware).

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mine", get(handler::my_products))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
