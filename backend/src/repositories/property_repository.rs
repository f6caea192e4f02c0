//! Database repository for properties.
//!
//! Provides CRUD operations for the Property entity. Deleting a property also
//! removes its rooms and every picture attached to the property or its rooms.

use crate::database::models::{EntityType, Property, PropertyRecord};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const PROPERTY_COLUMNS: &str = "id, host_id, name, description, property_type_id, availability_id, \
     address, city_id, map_location, price, min_night, max_night, check_in_time, check_out_time, \
     created_at, updated_at";

pub struct PropertyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PropertyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        // Shared SQLite connection pool
        Self { pool }
    }

    /// Lists a host's properties, newest first.
    pub async fn list_by_host(&self, host_id: &str, limit: i64, offset: i64) -> Result<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE host_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        ))
        .bind(host_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(properties)
    }

    pub async fn count_by_host(&self, host_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM properties WHERE host_id = ?")
            .bind(host_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Retrieves a property by its ID.
    ///
    /// # Returns
    /// `Some(Property)` if found, `None` otherwise
    pub async fn get_property_by_id(&self, id: i64) -> Result<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(property)
    }

    pub async fn create_property(&self, record: PropertyRecord) -> Result<Property> {
        let now = Utc::now();

        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            INSERT INTO properties (
                host_id, name, description, property_type_id, availability_id, address,
                city_id, map_location, price, min_night, max_night, check_in_time,
                check_out_time, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(&record.host_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.property_type_id)
        .bind(record.availability_id)
        .bind(&record.address)
        .bind(record.city_id)
        .bind(&record.map_location)
        .bind(record.price)
        .bind(record.min_night)
        .bind(record.max_night)
        .bind(&record.check_in_time)
        .bind(&record.check_out_time)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(property)
    }

    /// Overwrites every editable column. The host never changes.
    pub async fn update_property(&self, id: i64, record: PropertyRecord) -> Result<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            UPDATE properties SET
                name = ?, description = ?, property_type_id = ?, availability_id = ?,
                address = ?, city_id = ?, map_location = ?, price = ?, min_night = ?,
                max_night = ?, check_in_time = ?, check_out_time = ?, updated_at = ?
            WHERE id = ?
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.property_type_id)
        .bind(record.availability_id)
        .bind(&record.address)
        .bind(record.city_id)
        .bind(&record.map_location)
        .bind(record.price)
        .bind(record.min_night)
        .bind(record.max_night)
        .bind(&record.check_in_time)
        .bind(&record.check_out_time)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(property)
    }

    /// Deletes a property together with its rooms and their pictures.
    ///
    /// # Returns
    /// `true` if the property existed
    pub async fn delete_property(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM pictures WHERE entity_type = ? \
             AND entity_id IN (SELECT id FROM rooms WHERE property_id = ?)",
        )
        .bind(EntityType::Room.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM pictures WHERE entity_type = ? AND entity_id = ?")
            .bind(EntityType::Property.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM rooms WHERE property_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn average_price_by_host(&self, host_id: &str) -> Result<Option<f64>> {
        let average: Option<f64> =
            sqlx::query_scalar("SELECT AVG(price) FROM properties WHERE host_id = ?")
                .bind(host_id)
                .fetch_one(self.pool)
                .await?;

        Ok(average)
    }

    /// Property counts per type for a host, including types with no properties.
    pub async fn count_by_type_for_host(&self, host_id: &str) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT pt.name, COUNT(p.id)
            FROM property_types pt
            LEFT JOIN properties p ON p.property_type_id = pt.id AND p.host_id = ?
            GROUP BY pt.id, pt.name
            ORDER BY pt.display_order, pt.id
            "#,
        )
        .bind(host_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
