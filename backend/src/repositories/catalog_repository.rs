//! Database repository for the reference tables.
//!
//! Read access to property types, cities, amenities, amenity categories, room
//! types and availabilities, plus amenity creation and the existence checks
//! the property and room services run before writing foreign keys.

use crate::database::models::{
    Amenity, AmenityCategory, Availability, City, CreateAmenity, PropertyType, RoomType,
};
use anyhow::Result;
use sqlx::SqlitePool;

pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_property_types(&self) -> Result<Vec<PropertyType>> {
        let rows = sqlx::query_as::<_, PropertyType>(
            "SELECT id, name, icon_url, display_order FROM property_types ORDER BY display_order, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_cities(&self) -> Result<Vec<City>> {
        let rows = sqlx::query_as::<_, City>(
            "SELECT id, name, display_order, region_id FROM cities ORDER BY display_order, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_amenities(&self) -> Result<Vec<Amenity>> {
        let rows = sqlx::query_as::<_, Amenity>(
            "SELECT id, name, icon, amenity_category_id, category FROM amenities ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_amenity_categories(&self) -> Result<Vec<AmenityCategory>> {
        let rows = sqlx::query_as::<_, AmenityCategory>(
            "SELECT id, name FROM amenity_categories ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_room_types(&self) -> Result<Vec<RoomType>> {
        let rows = sqlx::query_as::<_, RoomType>(
            "SELECT id, name, icon_url, display_order FROM room_types ORDER BY display_order, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_availabilities(&self) -> Result<Vec<Availability>> {
        let rows = sqlx::query_as::<_, Availability>("SELECT id, name FROM availabilities ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Name of an amenity category, `None` when the id is unknown.
    pub async fn amenity_category_name(&self, id: i64) -> Result<Option<String>> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM amenity_categories WHERE id = ?")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(name)
    }

    /// Inserts an amenity with its category name copied alongside.
    pub async fn create_amenity(&self, amenity: &CreateAmenity, category: &str) -> Result<Amenity> {
        let amenity = sqlx::query_as::<_, Amenity>(
            r#"
            INSERT INTO amenities (name, icon, amenity_category_id, category)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, icon, amenity_category_id, category
            "#,
        )
        .bind(amenity.name.trim())
        .bind(amenity.icon.trim())
        .bind(amenity.amenity_category_id)
        .bind(category)
        .fetch_one(self.pool)
        .await?;

        Ok(amenity)
    }

    pub async fn property_type_exists(&self, id: i64) -> Result<bool> {
        self.row_exists("SELECT COUNT(*) FROM property_types WHERE id = ?", id)
            .await
    }

    pub async fn city_exists(&self, id: i64) -> Result<bool> {
        self.row_exists("SELECT COUNT(*) FROM cities WHERE id = ?", id).await
    }

    pub async fn availability_exists(&self, id: i64) -> Result<bool> {
        self.row_exists("SELECT COUNT(*) FROM availabilities WHERE id = ?", id)
            .await
    }

    pub async fn room_type_exists(&self, id: i64) -> Result<bool> {
        self.row_exists("SELECT COUNT(*) FROM room_types WHERE id = ?", id)
            .await
    }

    async fn row_exists(&self, query: &str, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(query)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }
}
