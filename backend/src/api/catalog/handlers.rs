//! Handler functions for the reference data endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{
    Amenity, AmenityCategory, Availability, City, CreateAmenity, PropertyType, RoomType,
};
use crate::services::catalog_service::CatalogService;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

type ListResult<T> = Result<ResponseJson<ApiResponse<Vec<T>>>, (StatusCode, String)>;

#[axum::debug_handler]
pub async fn list_property_types(Extension(pool): Extension<SqlitePool>) -> ListResult<PropertyType> {
    match CatalogService::new(&pool).property_types().await {
        Ok(rows) => Ok(ResponseJson(ApiResponse::ok(rows))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_cities(Extension(pool): Extension<SqlitePool>) -> ListResult<City> {
    match CatalogService::new(&pool).cities().await {
        Ok(rows) => Ok(ResponseJson(ApiResponse::ok(rows))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_amenities(Extension(pool): Extension<SqlitePool>) -> ListResult<Amenity> {
    match CatalogService::new(&pool).amenities().await {
        Ok(rows) => Ok(ResponseJson(ApiResponse::ok(rows))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn create_amenity(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateAmenity>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Amenity>>), (StatusCode, String)> {
    match CatalogService::new(&pool).create_amenity(payload).await {
        Ok(amenity) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(amenity, "Amenity created successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_amenity_categories(
    Extension(pool): Extension<SqlitePool>,
) -> ListResult<AmenityCategory> {
    match CatalogService::new(&pool).amenity_categories().await {
        Ok(rows) => Ok(ResponseJson(ApiResponse::ok(rows))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_room_types(Extension(pool): Extension<SqlitePool>) -> ListResult<RoomType> {
    match CatalogService::new(&pool).room_types().await {
        Ok(rows) => Ok(ResponseJson(ApiResponse::ok(rows))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn list_availabilities(Extension(pool): Extension<SqlitePool>) -> ListResult<Availability> {
    match CatalogService::new(&pool).availabilities().await {
        Ok(rows) => Ok(ResponseJson(ApiResponse::ok(rows))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
