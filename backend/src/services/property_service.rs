//! Property business logic service.
//!
//! Validates property forms, resolves their reference ids and enforces that
//! only the owning host can change or remove a property.

use crate::api::common::PaginationFilter;
use crate::database::models::{Property, PropertyForm, PropertyRecord, normalize_time_of_day};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::catalog_repository::CatalogRepository;
use crate::repositories::property_repository::PropertyRepository;
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

/// Availability assigned when a form does not name one.
pub const DEFAULT_AVAILABILITY_ID: i64 = 1;

pub struct PropertyService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PropertyService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of the host's properties and the host's total property count.
    pub async fn list_properties(
        &self,
        host_id: &str,
        filter: &PaginationFilter,
    ) -> ServiceResult<(Vec<Property>, u64)> {
        let repo = PropertyRepository::new(self.pool);
        let properties = repo
            .list_by_host(host_id, filter.limit(), filter.offset())
            .await?;
        let total = repo.count_by_host(host_id).await?;
        Ok((properties, total.max(0) as u64))
    }

    /// # Errors
    /// Returns `ServiceError::NotFound` if the property doesn't exist
    pub async fn get_property_required(&self, id: i64) -> ServiceResult<Property> {
        PropertyRepository::new(self.pool)
            .get_property_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Property", id.to_string()))
    }

    pub async fn create_property(&self, host_id: &str, form: PropertyForm) -> ServiceResult<Property> {
        let record = self.build_record(host_id, form).await?;
        let property = PropertyRepository::new(self.pool)
            .create_property(record)
            .await?;

        info!("Host {} created property {}", host_id, property.id);
        Ok(property)
    }

    /// # Errors
    /// `NotFound` when the property is absent, `PermissionDenied` when the
    /// caller is not its host.
    pub async fn update_property(
        &self,
        host_id: &str,
        id: i64,
        form: PropertyForm,
    ) -> ServiceResult<Property> {
        self.get_owned_property(host_id, id).await?;
        let record = self.build_record(host_id, form).await?;

        PropertyRepository::new(self.pool)
            .update_property(id, record)
            .await?
            .ok_or_else(|| ServiceError::not_found("Property", id.to_string()))
    }

    /// Removes the property with its rooms and pictures.
    pub async fn delete_property(&self, host_id: &str, id: i64) -> ServiceResult<()> {
        self.get_owned_property(host_id, id).await?;

        if !PropertyRepository::new(self.pool).delete_property(id).await? {
            return Err(ServiceError::not_found("Property", id.to_string()));
        }

        info!("Host {} deleted property {}", host_id, id);
        Ok(())
    }

    /// Loads a property and checks the caller hosts it.
    pub async fn get_owned_property(&self, host_id: &str, id: i64) -> ServiceResult<Property> {
        let property = self.get_property_required(id).await?;
        if property.host_id != host_id {
            return Err(ServiceError::permission_denied(
                "Only the property host can modify this property",
            ));
        }
        Ok(property)
    }

    async fn build_record(&self, host_id: &str, form: PropertyForm) -> ServiceResult<PropertyRecord> {
        if let Err(validation_errors) = form.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let catalog = CatalogRepository::new(self.pool);
        if !catalog.property_type_exists(form.property_type_id).await? {
            return Err(ServiceError::validation(format!(
                "propertyTypeId: Unknown property type {}",
                form.property_type_id
            )));
        }
        if !catalog.city_exists(form.city_id).await? {
            return Err(ServiceError::validation(format!(
                "cityId: Unknown city {}",
                form.city_id
            )));
        }

        let availability_id = form.availability_id.unwrap_or(DEFAULT_AVAILABILITY_ID);
        if !catalog.availability_exists(availability_id).await? {
            return Err(ServiceError::validation(format!(
                "availabilityId: Unknown availability {}",
                availability_id
            )));
        }

        // Both times passed validation, so normalization cannot fail here.
        let check_in_time = normalize_time_of_day(&form.check_in_time)
            .ok_or_else(|| ServiceError::validation("checkInTime: Invalid time"))?;
        let check_out_time = normalize_time_of_day(&form.check_out_time)
            .ok_or_else(|| ServiceError::validation("checkOutTime: Invalid time"))?;

        Ok(PropertyRecord {
            host_id: host_id.to_string(),
            name: form.name.trim().to_string(),
            description: non_blank(form.description),
            property_type_id: form.property_type_id,
            availability_id,
            address: form.address.trim().to_string(),
            city_id: form.city_id,
            map_location: non_blank(form.map_location),
            price: form.price,
            min_night: form.min_night,
            max_night: form.max_night,
            check_in_time,
            check_out_time,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::models::CreateUser;
    use crate::database::test_pool;
    use crate::repositories::user_repository::UserRepository;

    pub(crate) async fn create_host(pool: &SqlitePool, email: &str) -> String {
        UserRepository::new(pool)
            .create_user(CreateUser {
                email: email.to_string(),
                username: email.split('@').next().unwrap_or(email).to_string(),
                password_hash: "not-a-real-hash".to_string(),
                first_name: None,
                last_name: None,
                user_type: "Host".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    pub(crate) fn form(name: &str) -> PropertyForm {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "propertyTypeId": 1,
            "address": "12 Chavchavadze Ave",
            "cityId": 2,
            "price": 95,
            "checkInTime": "15:00"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_property_normalizes_and_defaults() {
        let pool = test_pool().await;
        let host_id = create_host(&pool, "host@example.com").await;
        let service = PropertyService::new(&pool);

        let property = service
            .create_property(&host_id, form("  Old Town Flat  "))
            .await
            .unwrap();

        assert_eq!(property.name, "Old Town Flat");
        assert_eq!(property.host_id, host_id);
        assert_eq!(property.check_in_time, "15:00:00");
        assert_eq!(property.check_out_time, "11:00:00");
        assert_eq!(property.availability_id, DEFAULT_AVAILABILITY_ID);
    }

    #[tokio::test]
    async fn test_create_property_rejects_unknown_city() {
        let pool = test_pool().await;
        let host_id = create_host(&pool, "host@example.com").await;
        let service = PropertyService::new(&pool);

        let mut bad = form("Nowhere");
        bad.city_id = 404;
        let result = service.create_property(&host_id, bad).await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_only_host_can_update_or_delete() {
        let pool = test_pool().await;
        let owner = create_host(&pool, "owner@example.com").await;
        let intruder = create_host(&pool, "intruder@example.com").await;
        let service = PropertyService::new(&pool);

        let property = service.create_property(&owner, form("Mine")).await.unwrap();

        let update = service
            .update_property(&intruder, property.id, form("Theirs"))
            .await;
        assert!(matches!(update, Err(ServiceError::PermissionDenied { .. })));

        let delete = service.delete_property(&intruder, property.id).await;
        assert!(matches!(delete, Err(ServiceError::PermissionDenied { .. })));

        let updated = service
            .update_property(&owner, property.id, form("Still Mine"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Still Mine");

        service.delete_property(&owner, property.id).await.unwrap();
        let gone = service.get_property_required(property.id).await;
        assert!(matches!(gone, Err(ServiceError::NotFound { .. })));
    }
}
