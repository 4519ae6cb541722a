//! Product API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::auth::{CurrentUser, ensure_role};
use crate::core::ServerState;
use crate::db::models::{
    Product, ProductCreate, ProductDetail, ProductUpdate, Role, UserPublic,
};
use crate::db::repository::{ProductRepository, UserRepository};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult, ok, ok_with_message};

/// GET /api/products - public catalog (active products, newest first)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all_active().await?;
    Ok(ok(products))
}

/// GET /api/products/:id - public detail with the seller resolved
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let users = UserRepository::new(state.db.clone());
    let seller = users.find_by_id(&product.seller.to_string()).await?;
    let seller_profile = seller.as_ref().map(UserPublic::from).unwrap_or(UserPublic {
        id: product.seller.to_string(),
        name: String::new(),
        email: String::new(),
    });

    Ok(ok(ProductDetail {
        product,
        seller_profile,
    }))
}

fn validate_product_numbers(price: f64, stock: i64) -> AppResult<()> {
    if price.is_nan() || price < 0.0 {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if stock < 0 {
        return Err(AppError::validation("Stock cannot be negative"));
    }
    Ok(())
}

/// POST /api/products - create a listing (seller only)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<ProductCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    ensure_role(&user, Role::Seller)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    let stock = payload.stock.unwrap_or(0);
    validate_product_numbers(payload.price, stock)?;

    let seller = user
        .id
        .parse()
        .map_err(|_| AppError::internal(format!("invalid seller id: {}", user.id)))?;

    let now = Utc::now();
    let product = Product {
        id: None,
        name: payload.name,
        description: payload.description,
        category: payload.category,
        price: payload.price,
        currency: payload.currency.unwrap_or_else(|| "INR".to_string()),
        images: payload.images.unwrap_or_default(),
        seller,
        stock,
        is_active: true,
        is_verified: false,
        tags: payload.tags.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let repo = ProductRepository::new(state.db.clone());
    let created = repo.create(product).await?;

    tracing::info!(
        product_id = %created.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        seller = %user.id,
        "Product created"
    );

    Ok((
        StatusCode::CREATED,
        ok_with_message(created, "Product created successfully"),
    ))
}

/// PUT /api/products/:id - update a listing (owning seller only)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    ensure_role(&user, Role::Seller)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if product.seller.to_string() != user.id {
        return Err(AppError::forbidden("Not authorized to update this product"));
    }

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(description) = &payload.description {
        validate_required_text(description, "description", MAX_DESCRIPTION_LEN)?;
    }
    validate_product_numbers(
        payload.price.unwrap_or(0.0),
        payload.stock.unwrap_or(0),
    )?;

    let updated = repo.update(&id, payload).await?;

    Ok(ok_with_message(updated, "Product updated successfully"))
}

/// DELETE /api/products/:id - remove a listing (owning seller only)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    ensure_role(&user, Role::Seller)?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if product.seller.to_string() != user.id {
        return Err(AppError::forbidden("Not authorized to delete this product"));
    }

    repo.delete(&id).await?;

    Ok(ok_with_message((), "Product removed"))
}

/// GET /api/products/mine - the requesting seller's listings
pub async fn my_products(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    ensure_role(&user, Role::Seller)?;

    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_by_seller(&user.id).await?;
    Ok(ok(products))
}
