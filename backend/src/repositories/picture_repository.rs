//! Database repository for uploaded pictures.
//!
//! Pictures are stored inline as `data:` URLs and are attached to either a
//! property or a room through `(entity_type, entity_id)`.

use crate::database::models::{CreatePicture, EntityType, Picture};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const PICTURE_COLUMNS: &str =
    "id, file_name, content_type, file_size, picture_type, entity_id, entity_type, uploaded_at, url";

pub struct PictureRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PictureRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_picture(&self, picture: CreatePicture) -> Result<Picture> {
        let picture = sqlx::query_as::<_, Picture>(&format!(
            r#"
            INSERT INTO pictures (file_name, content_type, file_size, picture_type, entity_id, entity_type, uploaded_at, url)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {PICTURE_COLUMNS}
            "#
        ))
        .bind(&picture.file_name)
        .bind(&picture.content_type)
        .bind(picture.file_size)
        .bind(picture.picture_type.as_str())
        .bind(picture.entity_id)
        .bind(picture.entity_type.as_str())
        .bind(Utc::now())
        .bind(&picture.url)
        .fetch_one(self.pool)
        .await?;

        Ok(picture)
    }

    pub async fn get_picture_by_id(&self, id: i64) -> Result<Option<Picture>> {
        let picture = sqlx::query_as::<_, Picture>(&format!(
            "SELECT {PICTURE_COLUMNS} FROM pictures WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(picture)
    }

    /// Pictures attached to one entity, oldest upload first.
    pub async fn list_by_entity(&self, entity_type: EntityType, entity_id: i64) -> Result<Vec<Picture>> {
        let pictures = sqlx::query_as::<_, Picture>(&format!(
            "SELECT {PICTURE_COLUMNS} FROM pictures WHERE entity_type = ? AND entity_id = ? \
             ORDER BY uploaded_at, id"
        ))
        .bind(entity_type.as_str())
        .bind(entity_id)
        .fetch_all(self.pool)
        .await?;

        Ok(pictures)
    }

    /// # Returns
    /// `true` if a picture was deleted
    pub async fn delete_picture(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pictures WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Pictures attached to a host's properties or to rooms of those properties.
    pub async fn count_by_host(&self, host_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM pictures pic
            WHERE (pic.entity_type = 'Property'
                   AND pic.entity_id IN (SELECT id FROM properties WHERE host_id = ?))
               OR (pic.entity_type = 'Room'
                   AND pic.entity_id IN (
                       SELECT r.id FROM rooms r JOIN properties p ON p.id = r.property_id
                       WHERE p.host_id = ?))
            "#,
        )
        .bind(host_id)
        .bind(host_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
