//! Admin handlers
//!
//! Moderation of accounts and listings. All callers are admins by the time
//! these run (router middleware).

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Product, Role, UserResponse, UserUpdate};
use crate::db::repository::{ProductRepository, UserRepository};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult, ok, ok_with_message};

// =============================================================================
// User management
// =============================================================================

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(ok(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/admin/users/:id
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(UserResponse::from(user)))
}

/// PUT /api/admin/users/:id - name / role / active flag
pub async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UserUpdate>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let repo = UserRepository::new(state.db.clone());
    if repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let updated = repo.update(&id, payload).await?;
    tracing::info!(user_id = %id, "User updated by admin");
    Ok(ok_with_message(
        UserResponse::from(updated),
        "User updated successfully",
    ))
}

/// DELETE /api/admin/users/:id
pub async fn delete_user(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = UserRepository::new(state.db.clone());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let target_id = target.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    if target_id == admin.id {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    repo.delete(&id).await?;
    tracing::info!(user_id = %id, by = %admin.id, "User deleted");
    Ok(ok_with_message((), "User removed"))
}

/// PUT /api/admin/users/:id/verify - approve a seller
pub async fn verify_seller(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    set_seller_verified(&state, &id, true).await
}

/// PUT /api/admin/users/:id/unverify - revoke seller approval
pub async fn unverify_seller(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    set_seller_verified(&state, &id, false).await
}

async fn set_seller_verified(
    state: &ServerState,
    id: &str,
    verified: bool,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if user.role != Role::Seller {
        return Err(AppError::validation("User is not a seller"));
    }

    let updated = repo.set_verified(id, verified).await?;
    tracing::info!(user_id = %id, verified, "Seller verification changed");
    let message = if verified {
        "Seller verified successfully"
    } else {
        "Seller verification revoked"
    };
    Ok(ok_with_message(UserResponse::from(updated), message))
}

// =============================================================================
// Product moderation
// =============================================================================

/// GET /api/admin/products - includes inactive listings
pub async fn list_products(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await?;
    Ok(ok(products))
}

/// GET /api/admin/products/:id
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(ok(product))
}

/// DELETE /api/admin/products/:id
pub async fn delete_product(
    State(state): State<ServerState>,
    admin: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let repo = ProductRepository::new(state.db.clone());
    if !repo.delete(&id).await? {
        return Err(AppError::not_found("Product not found"));
    }
    tracing::info!(product_id = %id, by = %admin.id, "Product deleted by admin");
    Ok(ok_with_message((), "Product removed"))
}

/// PUT /api/admin/products/:id/verify
pub async fn verify_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    set_product_verified(&state, &id, true).await
}

/// PUT /api/admin/products/:id/unverify
pub async fn unverify_product(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    set_product_verified(&state, &id, false).await
}

async fn set_product_verified(
    state: &ServerState,
    id: &str,
    verified: bool,
) -> AppResult<Json<ApiResponse<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("Product not found"));
    }

    let updated = repo.set_verified(id, verified).await?;
    tracing::info!(product_id = %id, verified, "Product verification changed");
    let message = if verified {
        "Product verified successfully"
    } else {
        "Product verification revoked"
    };
    Ok(ok_with_message(updated, message))
}
