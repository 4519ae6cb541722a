//! Auth handlers
//!
//! Registration issues a token immediately; login re-checks credentials and
//! the active flag. Credential failures use one uniform message so the
//! endpoint cannot be used to probe which emails exist.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User, UserResponse, UserUpdate};
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppJson, AppResult, ok, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Identity payload returned by register/login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// POST /api/users/register
pub async fn register(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation("Password is too long"));
    }

    let repo = UserRepository::new(state.db.clone());

    if repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::validation("User already exists with this email"));
    }

    let role = payload.role.unwrap_or_default();
    let password_hash = User::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let now = Utc::now();
    let user = User {
        id: None,
        name: payload.name,
        email: payload.email.to_lowercase(),
        password_hash,
        role,
        is_active: true,
        // Sellers need admin verification before their listings count
        is_verified: role != Role::Seller,
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(user).await.map_err(|e| match e {
        // Lost a race against a concurrent registration with the same email
        RepoError::Duplicate(_) => AppError::validation("User already exists with this email"),
        other => other.into(),
    })?;

    let user_id = created.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, created.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, role = %created.role, "User registered");

    let response = AuthResponse {
        id: user_id,
        name: created.name,
        email: created.email,
        role: created.role,
        token,
    };

    Ok((
        StatusCode::CREATED,
        ok_with_message(response, "User registered successfully"),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::validation("Please provide email and password"));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.find_by_email(&payload.email.to_lowercase()).await?;

    // Fixed delay before checking the result, to prevent timing attacks
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => {
            let password_valid = user
                .verify_password(&payload.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                tracing::warn!(email = %payload.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            user
        }
        None => {
            tracing::warn!(email = %payload.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.is_active {
        return Err(AppError::unauthorized_with("Account is deactivated"));
    }

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .jwt_service
        .generate_token(&user_id, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, role = %user.role, "User logged in");

    let response = AuthResponse {
        id: user_id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    };

    Ok(ok_with_message(response, "Login successful"))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let repo = UserRepository::new(state.db.clone());
    let account = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(UserResponse::from(account)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let repo = UserRepository::new(state.db.clone());
    let updated = repo
        .update(
            &user.id,
            UserUpdate {
                name: payload.name,
                role: None,
                is_active: None,
            },
        )
        .await?;

    Ok(ok_with_message(
        UserResponse::from(updated),
        "Profile updated successfully",
    ))
}
