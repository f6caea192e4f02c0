//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, login,
//! current-user lookup and logout, and delegate to `auth::service` for the
//! business logic.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::{Claims, JwtUtils};
use crate::utils::password::PasswordHasher;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Extension(hasher): Extension<PasswordHasher>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ResponseJson<AuthResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &jwt_utils, &hasher);

    match auth_service.register(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Extension(hasher): Extension<PasswordHasher>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<AuthResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &jwt_utils, &hasher);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<LogoutResponse> {
    // Tokens are not tracked server-side; the client drops its copy.
    ResponseJson(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(jwt_utils): Extension<JwtUtils>,
    Extension(hasher): Extension<PasswordHasher>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<MeResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &jwt_utils, &hasher);

    match auth_service.current_user(&claims).await {
        Ok(user) => Ok(ResponseJson(MeResponse { user })),
        Err(error) => Err(service_error_to_http(error)),
    }
}
