//! Authentication middleware
//!
//! Validates the bearer token and resolves the account from the database on
//! every request, so role changes and deactivation take effect immediately
//! instead of riding out the token lifetime. The resolved [`CurrentUser`] is
//! injected into request extensions for handlers and route middleware.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::JwtService;
use crate::core::ServerState;
use crate::db::models::{Role, User};
use crate::db::repository::UserRepository;
use crate::security_log;

/// Request-scoped user context, resolved fresh from the database
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// "user:xyz"
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }
}

/// Routes that skip authentication
///
/// - CORS preflight and anything outside `/api/`
/// - register / login / health
/// - public catalog reads (`GET /api/products...`), except the seller-only
///   `/api/products/mine`
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    if !path.starts_with("/api/") {
        return true;
    }
    if path == "/api/health" || path == "/api/users/register" || path == "/api/users/login" {
        return true;
    }
    if method == Method::GET
        && path.starts_with("/api/products")
        && path != "/api/products/mine"
    {
        return true;
    }
    false
}

/// Validate a token and load the account behind it
pub async fn resolve_current_user(
    state: &ServerState,
    token: &str,
) -> Result<CurrentUser, AppError> {
    let claims = state.jwt_service.validate_token(token).map_err(|e| match e {
        crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::unauthorized_with("Not authorized, user not found"))?;

    if !user.is_active {
        return Err(AppError::unauthorized_with("Account is deactivated"));
    }

    Ok(CurrentUser::from_user(&user))
}

/// Authentication middleware - requires a valid bearer token on every
/// non-public API route
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    if is_public_route(req.method(), &path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = path.clone());
            return Err(AppError::unauthorized());
        }
    };

    match resolve_current_user(&state, token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!("WARN", "auth_failed", error = format!("{}", e), uri = path);
            Err(e)
        }
    }
}

/// Admin middleware - requires the admin role
///
/// Must run inside `require_auth` so the extension is populated.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            user_role = user.role.to_string()
        );
        return Err(AppError::forbidden("Not authorized as an admin"));
    }

    Ok(next.run(req).await)
}

/// Role gate used inside handlers whose route is shared with other roles
pub fn ensure_role(user: &CurrentUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_login_health_are_public() {
        assert!(is_public_route(&Method::POST, "/api/users/register"));
        assert!(is_public_route(&Method::POST, "/api/users/login"));
        assert!(is_public_route(&Method::GET, "/api/health"));
    }

    #[test]
    fn catalog_reads_are_public_but_mine_is_not() {
        assert!(is_public_route(&Method::GET, "/api/products"));
        assert!(is_public_route(&Method::GET, "/api/products/product:abc"));
        assert!(!is_public_route(&Method::GET, "/api/products/mine"));
        assert!(!is_public_route(&Method::POST, "/api/products"));
    }

    #[test]
    fn order_routes_require_auth() {
        assert!(!is_public_route(&Method::POST, "/api/orders"));
        assert!(!is_public_route(&Method::GET, "/api/orders/myorders"));
        assert!(!is_public_route(&Method::PUT, "/api/orders/order:1/pay"));
    }

    #[test]
    fn non_api_paths_fall_through() {
        assert!(is_public_route(&Method::GET, "/"));
        assert!(is_public_route(&Method::GET, "/favicon.ico"));
    }
}
