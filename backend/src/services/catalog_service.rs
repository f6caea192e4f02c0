//! Reference data service.
//!
//! Thin layer over `CatalogRepository` for the lookup lists shown in property
//! and room forms, plus amenity creation.

use crate::database::models::{
    Amenity, AmenityCategory, Availability, City, CreateAmenity, PropertyType, RoomType,
};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::catalog_repository::CatalogRepository;
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

pub struct CatalogService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> CatalogRepository<'a> {
        CatalogRepository::new(self.pool)
    }

    pub async fn property_types(&self) -> ServiceResult<Vec<PropertyType>> {
        Ok(self.repo().list_property_types().await?)
    }

    pub async fn cities(&self) -> ServiceResult<Vec<City>> {
        Ok(self.repo().list_cities().await?)
    }

    pub async fn amenities(&self) -> ServiceResult<Vec<Amenity>> {
        Ok(self.repo().list_amenities().await?)
    }

    pub async fn amenity_categories(&self) -> ServiceResult<Vec<AmenityCategory>> {
        Ok(self.repo().list_amenity_categories().await?)
    }

    pub async fn room_types(&self) -> ServiceResult<Vec<RoomType>> {
        Ok(self.repo().list_room_types().await?)
    }

    pub async fn availabilities(&self) -> ServiceResult<Vec<Availability>> {
        Ok(self.repo().list_availabilities().await?)
    }

    /// Creates an amenity under an existing category.
    ///
    /// # Errors
    /// `Validation` when a field is blank or the category is unknown
    pub async fn create_amenity(&self, request: CreateAmenity) -> ServiceResult<Amenity> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }
        if request.name.trim().is_empty() || request.icon.trim().is_empty() {
            return Err(ServiceError::validation("name, icon: must not be blank"));
        }

        let repo = self.repo();
        let category = repo
            .amenity_category_name(request.amenity_category_id)
            .await?
            .ok_or_else(|| {
                ServiceError::validation(format!(
                    "amenityCategoryId: Unknown amenity category {}",
                    request.amenity_category_id
                ))
            })?;

        let amenity = repo.create_amenity(&request, &category).await?;
        info!("Created amenity {} ({})", amenity.id, amenity.name);
        Ok(amenity)
    }
}
