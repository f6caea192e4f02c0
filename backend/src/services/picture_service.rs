//! Picture upload and lookup service.
//!
//! Uploaded images are checked against the MIME allow-list and the size limit,
//! then stored inline as `data:<mime>;base64,<payload>` URLs.

use crate::database::models::{CreatePicture, EntityType, Picture, PictureType};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::picture_repository::PictureRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::services::property_service::PropertyService;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sqlx::SqlitePool;
use tracing::info;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Largest accepted upload, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct PictureService<'a> {
    pool: &'a SqlitePool,
    max_upload_bytes: usize,
}

impl<'a> PictureService<'a> {
    pub fn new(pool: &'a SqlitePool, max_upload_bytes: usize) -> Self {
        Self {
            pool,
            max_upload_bytes,
        }
    }

    /// Stores an uploaded image against a property or room of `host_id`.
    ///
    /// # Errors
    /// `Validation` for an empty, oversized or non-image file, `NotFound` when
    /// the target entity does not exist, `PermissionDenied` when it belongs to
    /// another host.
    pub async fn upload(
        &self,
        host_id: &str,
        picture_type: PictureType,
        entity_type: EntityType,
        entity_id: i64,
        file: UploadedFile,
    ) -> ServiceResult<Picture> {
        self.check_file(&file)?;
        self.ensure_owned_entity(host_id, entity_type, entity_id)
            .await?;

        let url = format!(
            "data:{};base64,{}",
            file.content_type,
            STANDARD.encode(&file.bytes)
        );

        let picture = PictureRepository::new(self.pool)
            .create_picture(CreatePicture {
                file_name: file.file_name,
                content_type: file.content_type,
                file_size: file.bytes.len() as i64,
                picture_type,
                entity_id,
                entity_type,
                url,
            })
            .await?;

        info!(
            "Stored {} picture {} for {} {}",
            picture_type.as_str(),
            picture.id,
            entity_type,
            entity_id
        );
        Ok(picture)
    }

    pub async fn list_pictures(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> ServiceResult<Vec<Picture>> {
        let pictures = PictureRepository::new(self.pool)
            .list_by_entity(entity_type, entity_id)
            .await?;
        Ok(pictures)
    }

    /// Deletes a picture attached to one of `host_id`'s properties or rooms.
    pub async fn delete_picture(&self, host_id: &str, id: i64) -> ServiceResult<()> {
        let repo = PictureRepository::new(self.pool);
        let picture = repo
            .get_picture_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Picture", id.to_string()))?;
        let entity_type = picture
            .entity_type
            .parse::<EntityType>()
            .map_err(ServiceError::internal_error)?;
        self.ensure_owned_entity(host_id, entity_type, picture.entity_id)
            .await?;

        if !repo.delete_picture(id).await? {
            return Err(ServiceError::not_found("Picture", id.to_string()));
        }
        info!("Deleted picture {}", id);
        Ok(())
    }

    fn check_file(&self, file: &UploadedFile) -> ServiceResult<()> {
        if file.bytes.is_empty() {
            return Err(ServiceError::validation("file: No file uploaded"));
        }
        if file.bytes.len() > self.max_upload_bytes {
            return Err(ServiceError::validation(format!(
                "file: File exceeds the {} byte limit",
                self.max_upload_bytes
            )));
        }
        if !ALLOWED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
            return Err(ServiceError::validation(format!(
                "file: Unsupported content type '{}', expected one of {}",
                file.content_type,
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }
        Ok(())
    }

    /// Resolves the property behind the entity and checks its host.
    async fn ensure_owned_entity(
        &self,
        host_id: &str,
        entity_type: EntityType,
        entity_id: i64,
    ) -> ServiceResult<()> {
        let property_id = match entity_type {
            EntityType::Property => entity_id,
            EntityType::Room => {
                RoomRepository::new(self.pool)
                    .get_room_by_id(entity_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Room", entity_id.to_string()))?
                    .property_id
            }
        };

        PropertyService::new(self.pool)
            .get_owned_property(host_id, property_id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::services::property_service::PropertyService;
    use crate::services::property_service::tests::{create_host, form};

    const LIMIT: usize = 1024;

    fn png(len: usize) -> UploadedFile {
        UploadedFile {
            file_name: "front.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89; len],
        }
    }

    #[tokio::test]
    async fn test_upload_stores_data_url() {
        let pool = test_pool().await;
        let host = create_host(&pool, "host@example.com").await;
        let property = PropertyService::new(&pool)
            .create_property(&host, form("Loft"))
            .await
            .unwrap();
        let service = PictureService::new(&pool, LIMIT);

        let picture = service
            .upload(&host, PictureType::Icon, EntityType::Property, property.id, png(3))
            .await
            .unwrap();

        assert_eq!(picture.url, "data:image/png;base64,iYmJ");
        assert_eq!(picture.file_size, 3);
        assert_eq!(picture.picture_type, "Icon");
        assert_eq!(
            service
                .list_pictures(EntityType::Property, property.id)
                .await
                .unwrap()
                .len(),
            1
        );

        service.delete_picture(&host, picture.id).await.unwrap();
        assert!(matches!(
            service.delete_picture(&host, picture.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_files_and_missing_entities() {
        let pool = test_pool().await;
        let host = create_host(&pool, "host@example.com").await;
        let service = PictureService::new(&pool, LIMIT);

        let oversized = service
            .upload(&host, PictureType::Regular, EntityType::Property, 1, png(LIMIT + 1))
            .await;
        assert!(matches!(oversized, Err(ServiceError::Validation { .. })));

        let gif = UploadedFile {
            content_type: "image/gif".to_string(),
            ..png(10)
        };
        let wrong_type = service
            .upload(&host, PictureType::Regular, EntityType::Property, 1, gif)
            .await;
        assert!(matches!(wrong_type, Err(ServiceError::Validation { .. })));

        let missing = service
            .upload(&host, PictureType::Regular, EntityType::Room, 42, png(10))
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_pictures_are_limited_to_the_owning_host() {
        let pool = test_pool().await;
        let host = create_host(&pool, "host@example.com").await;
        let other = create_host(&pool, "other@example.com").await;
        let property = PropertyService::new(&pool)
            .create_property(&host, form("Loft"))
            .await
            .unwrap();
        let service = PictureService::new(&pool, LIMIT);

        let foreign_upload = service
            .upload(&other, PictureType::Regular, EntityType::Property, property.id, png(4))
            .await;
        assert!(matches!(
            foreign_upload,
            Err(ServiceError::PermissionDenied { .. })
        ));

        let picture = service
            .upload(&host, PictureType::Regular, EntityType::Property, property.id, png(4))
            .await
            .unwrap();
        assert!(matches!(
            service.delete_picture(&other, picture.id).await,
            Err(ServiceError::PermissionDenied { .. })
        ));
        assert_eq!(
            service
                .list_pictures(EntityType::Property, property.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
