//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer token on every protected request and exposes the
//! decoded claims to handlers through the request extensions.

use crate::api::common::{error_response, service_error_to_http};
use crate::utils::jwt::JwtUtils;
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware
///
/// Missing or malformed header: 401. Token that fails validation: 403.
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned)
        .ok_or_else(|| {
            error_response(
                StatusCode::UNAUTHORIZED,
                "Access token required",
                "unauthenticated",
            )
        })?;

    let jwt_utils = request.extensions().get::<JwtUtils>().cloned().ok_or_else(|| {
        tracing::error!("JwtUtils extension is not installed");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            "internal_error",
        )
    })?;

    let claims = jwt_utils
        .validate_token(&token)
        .map_err(service_error_to_http)?;

    // Add claims to request extensions for use in handlers
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
