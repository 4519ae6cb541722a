//! Order API handlers
//!
//! Thin transport layer over [`OrderEngine`]; every operation receives the
//! resolved requesting user explicitly.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::{CurrentUser, ensure_role};
use crate::core::ServerState;
use crate::db::models::{Order, OrderDetail, OrderSummary, PaymentConfirmation, Role};
use crate::orders::{CreateOrderRequest, OrderEngine};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult, ok, ok_with_message};

fn engine(state: &ServerState) -> OrderEngine {
    OrderEngine::new(state.db.clone(), state.pricing.clone())
}

/// POST /api/orders - create an order from cart contents
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = engine(&state).create(&user, payload).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(order, "Order created successfully"),
    ))
}

/// GET /api/orders/:id - single order, buyer/seller resolved
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = engine(&state).get(&id, &user).await?;
    Ok(ok(detail))
}

/// Payment confirmation payload, in the shape the payment provider posts it
#[derive(Debug, Clone, Deserialize)]
pub struct PayRequest {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub payer: Payer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Payer {
    pub email_address: String,
}

/// PUT /api/orders/:id/pay - mark paid, storing the confirmation verbatim
pub async fn pay(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<PayRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let confirmation = PaymentConfirmation {
        id: payload.id,
        status: payload.status,
        update_time: payload.update_time,
        payer_email: payload.payer.email_address,
    };

    let order = engine(&state).pay(&id, confirmation).await?;
    Ok(ok_with_message(order, "Order updated to paid"))
}

/// PUT /api/orders/:id/deliver - mark delivered (order's seller or admin)
pub async fn deliver(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = engine(&state).deliver(&id, &user).await?;
    Ok(ok_with_message(order, "Order updated to delivered"))
}

/// GET /api/orders/myorders - the requester's purchases
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = engine(&state).orders_for_buyer(&user).await?;
    Ok(ok(orders))
}

/// GET /api/orders/mysellerorders - the requester's sales (sellers only)
pub async fn my_seller_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    ensure_role(&user, Role::Seller)?;
    let orders = engine(&state).orders_for_seller(&user).await?;
    Ok(ok(orders))
}

/// GET /api/orders - every order (admin only)
pub async fn list_all(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<OrderSummary>>>> {
    if !user.is_admin() {
        return Err(AppError::forbidden("Not authorized as an admin"));
    }
    let orders = engine(&state).all_orders().await?;
    Ok(ok(orders))
}
