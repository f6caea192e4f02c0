//! Handler functions for property management API endpoints.

use crate::api::common::{
    ApiResponse, PaginationFilter, PaginationMeta, service_error_to_http,
    validation_error_response,
};
use crate::database::models::{Property, PropertyForm};
use crate::services::property_service::PropertyService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Lists the calling host's properties, one page at a time.
#[axum::debug_handler]
pub async fn list_properties(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<PaginationFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Property>>>, (StatusCode, String)> {
    if let Err(validation_errors) = filter.validate() {
        return Err(validation_error_response(validation_errors));
    }

    let service = PropertyService::new(&pool);

    match service.list_properties(claims.user_id(), &filter).await {
        Ok((properties, total)) => Ok(ResponseJson(ApiResponse::paginated(
            properties,
            PaginationMeta::from_filter(&filter, total),
            "Properties retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_property(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Property>>, (StatusCode, String)> {
    let service = PropertyService::new(&pool);

    match service.get_property_required(id).await {
        Ok(property) => Ok(ResponseJson(ApiResponse::ok(property))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn create_property(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PropertyForm>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Property>>), (StatusCode, String)> {
    let service = PropertyService::new(&pool);

    match service.create_property(claims.user_id(), payload).await {
        Ok(property) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(
                property,
                "Property created successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_property(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<PropertyForm>,
) -> Result<ResponseJson<ApiResponse<Property>>, (StatusCode, String)> {
    let service = PropertyService::new(&pool);

    match service.update_property(claims.user_id(), id, payload).await {
        Ok(property) => Ok(ResponseJson(ApiResponse::success(
            property,
            "Property updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Deletes a property along with its rooms and pictures.
#[axum::debug_handler]
pub async fn delete_property(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = PropertyService::new(&pool);

    match service.delete_property(claims.user_id(), id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Property deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
