use crate::api::common::{ApiResponse, service_error_to_http};
use crate::services::dashboard_service::{DashboardService, DashboardSummary};
use crate::utils::jwt::Claims;
use axum::{extract::Extension, http::StatusCode, response::Json as ResponseJson};
use sqlx::SqlitePool;

/// Metrics for the calling host's portfolio.
#[axum::debug_handler]
pub async fn get_summary(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<DashboardSummary>>, (StatusCode, String)> {
    match DashboardService::new(&pool).summary(claims.user_id()).await {
        Ok(summary) => Ok(ResponseJson(ApiResponse::success(
            summary,
            "Dashboard summary retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
