//! Handler functions for picture upload, listing and deletion.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::database::models::{EntityType, Picture, PictureType};
use crate::errors::ServiceError;
use crate::services::picture_service::{PictureService, UploadLimit, UploadedFile};
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Multipart, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

const FILE_FIELD: &str = "file";

/// Query string naming the entity an upload is attached to.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureTarget {
    pub entity_id: i64,
    pub entity_type: String,
}

type UploadResult = Result<(StatusCode, ResponseJson<ApiResponse<Picture>>), (StatusCode, String)>;

#[axum::debug_handler]
pub async fn upload_regular(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Extension(limit): Extension<UploadLimit>,
    Query(target): Query<PictureTarget>,
    multipart: Multipart,
) -> UploadResult {
    upload(&pool, &claims, limit, PictureType::Regular, target, multipart).await
}

#[axum::debug_handler]
pub async fn upload_icon(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Extension(limit): Extension<UploadLimit>,
    Query(target): Query<PictureTarget>,
    multipart: Multipart,
) -> UploadResult {
    upload(&pool, &claims, limit, PictureType::Icon, target, multipart).await
}

async fn upload(
    pool: &SqlitePool,
    claims: &Claims,
    limit: UploadLimit,
    picture_type: PictureType,
    target: PictureTarget,
    multipart: Multipart,
) -> UploadResult {
    let entity_type = target
        .entity_type
        .parse::<EntityType>()
        .map_err(|message| service_error_to_http(ServiceError::validation(message)))?;

    let file = read_file_field(multipart)
        .await
        .map_err(service_error_to_http)?;

    let service = PictureService::new(pool, limit.0);
    match service
        .upload(claims.user_id(), picture_type, entity_type, target.entity_id, file)
        .await
    {
        Ok(picture) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(
                picture,
                "Picture uploaded successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Pulls the `file` part out of the form. Malformed or oversized bodies are
/// validation errors.
async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::validation(format!("file: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::validation(format!("file: {}", e.body_text())))?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(ServiceError::validation("file: No file uploaded"))
}

#[axum::debug_handler]
pub async fn list_pictures(
    Extension(pool): Extension<SqlitePool>,
    Extension(limit): Extension<UploadLimit>,
    Path((entity_type, entity_id)): Path<(String, i64)>,
) -> Result<ResponseJson<ApiResponse<Vec<Picture>>>, (StatusCode, String)> {
    let entity_type = entity_type
        .parse::<EntityType>()
        .map_err(|message| service_error_to_http(ServiceError::validation(message)))?;

    match PictureService::new(&pool, limit.0)
        .list_pictures(entity_type, entity_id)
        .await
    {
        Ok(pictures) => Ok(ResponseJson(ApiResponse::ok(pictures))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

#[axum::debug_handler]
pub async fn delete_picture(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Extension(limit): Extension<UploadLimit>,
    Path(id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    match PictureService::new(&pool, limit.0).delete_picture(claims.user_id(), id).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Picture deleted successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
