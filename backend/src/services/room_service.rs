//! Room business logic service.
//!
//! Rooms belong to a property; writing a room requires hosting that property.

use crate::database::models::{Room, RoomForm, RoomRecord};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::catalog_repository::CatalogRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::services::property_service::{DEFAULT_AVAILABILITY_ID, PropertyService};
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

pub struct RoomService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RoomService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// `NotFound` when the property does not exist
    pub async fn list_rooms(&self, property_id: i64) -> ServiceResult<Vec<Room>> {
        PropertyService::new(self.pool)
            .get_property_required(property_id)
            .await?;
        let rooms = RoomRepository::new(self.pool)
            .list_by_property(property_id)
            .await?;
        Ok(rooms)
    }

    pub async fn get_room_required(&self, id: i64) -> ServiceResult<Room> {
        RoomRepository::new(self.pool)
            .get_room_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Room", id.to_string()))
    }

    pub async fn create_room(&self, host_id: &str, form: RoomForm) -> ServiceResult<Room> {
        let record = self.build_record(host_id, form).await?;
        let room = RoomRepository::new(self.pool).create_room(record).await?;

        info!("Host {} added room {} to property {}", host_id, room.id, room.property_id);
        Ok(room)
    }

    /// Moving a room to another property requires hosting both.
    pub async fn update_room(&self, host_id: &str, id: i64, form: RoomForm) -> ServiceResult<Room> {
        let existing = self.get_room_required(id).await?;
        PropertyService::new(self.pool)
            .get_owned_property(host_id, existing.property_id)
            .await?;

        let record = self.build_record(host_id, form).await?;
        RoomRepository::new(self.pool)
            .update_room(id, record)
            .await?
            .ok_or_else(|| ServiceError::not_found("Room", id.to_string()))
    }

    pub async fn delete_room(&self, host_id: &str, id: i64) -> ServiceResult<()> {
        let existing = self.get_room_required(id).await?;
        PropertyService::new(self.pool)
            .get_owned_property(host_id, existing.property_id)
            .await?;

        if !RoomRepository::new(self.pool).delete_room(id).await? {
            return Err(ServiceError::not_found("Room", id.to_string()));
        }

        info!("Host {} deleted room {}", host_id, id);
        Ok(())
    }

    async fn build_record(&self, host_id: &str, form: RoomForm) -> ServiceResult<RoomRecord> {
        if let Err(validation_errors) = form.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        PropertyService::new(self.pool)
            .get_owned_property(host_id, form.property_id)
            .await?;

        let catalog = CatalogRepository::new(self.pool);
        if !catalog.room_type_exists(form.room_type_id).await? {
            return Err(ServiceError::validation(format!(
                "roomTypeId: Unknown room type {}",
                form.room_type_id
            )));
        }

        let availability_id = form.availability_id.unwrap_or(DEFAULT_AVAILABILITY_ID);
        if !catalog.availability_exists(availability_id).await? {
            return Err(ServiceError::validation(format!(
                "availabilityId: Unknown availability {}",
                availability_id
            )));
        }

        Ok(RoomRecord {
            property_id: form.property_id,
            room_type_id: form.room_type_id,
            availability_id,
            capacity: form.capacity,
            beds_count: form.beds_count,
            description: form
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}
