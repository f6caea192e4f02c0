//! Dashboard metrics for the calling host, computed from the store.

use crate::errors::ServiceResult;
use crate::repositories::picture_repository::PictureRepository;
use crate::repositories::property_repository::PropertyRepository;
use crate::repositories::room_repository::RoomRepository;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeCount {
    pub property_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_properties: i64,
    pub total_rooms: i64,
    pub total_pictures: i64,
    /// Rounded to two decimals; zero when the host has no properties.
    pub average_nightly_price: f64,
    pub properties_by_type: Vec<PropertyTypeCount>,
}

pub struct DashboardService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DashboardService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self, host_id: &str) -> ServiceResult<DashboardSummary> {
        let properties = PropertyRepository::new(self.pool);

        let total_properties = properties.count_by_host(host_id).await?;
        let average = properties.average_price_by_host(host_id).await?.unwrap_or(0.0);
        let properties_by_type = properties
            .count_by_type_for_host(host_id)
            .await?
            .into_iter()
            .map(|(property_type, count)| PropertyTypeCount {
                property_type,
                count,
            })
            .collect();

        Ok(DashboardSummary {
            total_properties,
            total_rooms: RoomRepository::new(self.pool).count_by_host(host_id).await?,
            total_pictures: PictureRepository::new(self.pool)
                .count_by_host(host_id)
                .await?,
            average_nightly_price: (average * 100.0).round() / 100.0,
            properties_by_type,
        })
    }
}
