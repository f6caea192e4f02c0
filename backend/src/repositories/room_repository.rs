//! Database repository for rooms.

use crate::database::models::{EntityType, Room, RoomRecord};
use anyhow::Result;
use sqlx::SqlitePool;

const ROOM_COLUMNS: &str =
    "id, property_id, room_type_id, availability_id, capacity, beds_count, description";

pub struct RoomRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoomRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_by_property(&self, property_id: i64) -> Result<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE property_id = ? ORDER BY id"
        ))
        .bind(property_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rooms)
    }

    pub async fn get_room_by_id(&self, id: i64) -> Result<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(room)
    }

    pub async fn create_room(&self, record: RoomRecord) -> Result<Room> {
        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            INSERT INTO rooms (property_id, room_type_id, availability_id, capacity, beds_count, description)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(record.property_id)
        .bind(record.room_type_id)
        .bind(record.availability_id)
        .bind(record.capacity)
        .bind(record.beds_count)
        .bind(&record.description)
        .fetch_one(self.pool)
        .await?;

        Ok(room)
    }

    pub async fn update_room(&self, id: i64, record: RoomRecord) -> Result<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            UPDATE rooms SET
                property_id = ?, room_type_id = ?, availability_id = ?,
                capacity = ?, beds_count = ?, description = ?
            WHERE id = ?
            RETURNING {ROOM_COLUMNS}
            "#
        ))
        .bind(record.property_id)
        .bind(record.room_type_id)
        .bind(record.availability_id)
        .bind(record.capacity)
        .bind(record.beds_count)
        .bind(&record.description)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(room)
    }

    /// Deletes a room and the pictures attached to it.
    ///
    /// # Returns
    /// `true` if the room existed
    pub async fn delete_room(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM pictures WHERE entity_type = ? AND entity_id = ?")
            .bind(EntityType::Room.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of rooms across all of a host's properties.
    pub async fn count_by_host(&self, host_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM rooms r JOIN properties p ON p.id = r.property_id WHERE p.host_id = ?",
        )
        .bind(host_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
