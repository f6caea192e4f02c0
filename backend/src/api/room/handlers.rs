//! Handler functions for room API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{Room, RoomForm};
use crate::services::room_service::RoomService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

#[axum::debug_handler]
pub async fn list_rooms_by_property(
    Extension(pool): Extension<SqlitePool>,
    Path(property_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Vec<Room>>>, (StatusCode, String)> {
    let service = RoomService::new(&pool);

    match service.list_rooms(property_id).await {
        Ok(rooms) => Ok(ResponseJson(ApiResponse::ok(rooms))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn get_room(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<Room>>, (StatusCode, String)> {
    let service = RoomService::new(&pool);

    match service.get_room_required(id).await {
        Ok(room) => Ok(ResponseJson(ApiResponse::ok(room))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn create_room(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RoomForm>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Room>>), (StatusCode, String)> {
    let service = RoomService::new(&pool);

    match service.create_room(claims.user_id(), payload).await {
        Ok(room) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(room, "Room created successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn update_room(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<RoomForm>,
) -> Result<ResponseJson<ApiResponse<Room>>, (StatusCode, String)> {
    let service = RoomService::new(&pool);

    match service.update_room(claims.user_id(), id, payload).await {
        Ok(room) => Ok(ResponseJson(ApiResponse::success(
            room,
            "Room updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_room(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let service = RoomService::new(&pool);

    match service.delete_room(claims.user_id(), id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Room deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
