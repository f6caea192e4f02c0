//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, together with the validated write payloads that feed
//! them. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// User type assigned to everyone who registers through the dashboard.
pub const DEFAULT_USER_TYPE: &str = "Host";

/// Credential record. The password hash never leaves the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub host_id: String,
    pub name: String,
    pub description: Option<String>,
    pub property_type_id: i64,
    pub availability_id: i64,
    pub address: String,
    pub city_id: i64,
    pub map_location: Option<String>,
    pub price: i64,
    pub min_night: i64,
    pub max_night: i64,
    pub check_in_time: String,
    pub check_out_time: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_min_night() -> i64 {
    1
}

fn default_max_night() -> i64 {
    30
}

fn default_check_in_time() -> String {
    "14:00:00".to_string()
}

fn default_check_out_time() -> String {
    "11:00:00".to_string()
}

/// Property create/update payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_night_range"))]
pub struct PropertyForm {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Property type is required"))]
    pub property_type_id: i64,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub address: String,

    #[serde(default)]
    #[validate(range(min = 1, message = "City is required"))]
    pub city_id: i64,

    pub map_location: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Price must be positive"))]
    pub price: i64,

    #[serde(default = "default_min_night")]
    #[validate(range(min = 1, message = "Minimum nights must be at least 1"))]
    pub min_night: i64,

    #[serde(default = "default_max_night")]
    #[validate(range(min = 1, message = "Maximum nights must be at least 1"))]
    pub max_night: i64,

    #[serde(default = "default_check_in_time")]
    #[validate(custom(function = "validate_time_of_day"))]
    pub check_in_time: String,

    #[serde(default = "default_check_out_time")]
    #[validate(custom(function = "validate_time_of_day"))]
    pub check_out_time: String,

    /// Older clients send the misspelled `availibilityId`.
    #[serde(default, alias = "availibilityId")]
    #[validate(range(min = 1, message = "Availability must be a valid id"))]
    pub availability_id: Option<i64>,
}

fn validate_night_range(form: &PropertyForm) -> Result<(), ValidationError> {
    if form.min_night > form.max_night {
        let mut error = ValidationError::new("night_range");
        error.message = Some("Minimum nights cannot exceed maximum nights".into());
        return Err(error);
    }
    Ok(())
}

/// Rejects empty and whitespace-only values.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Must not be blank".into());
        return Err(error);
    }
    Ok(())
}

fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if normalize_time_of_day(value).is_none() {
        let mut error = ValidationError::new("time_of_day");
        error.message = Some("Time must be HH:MM or HH:MM:SS".into());
        return Err(error);
    }
    Ok(())
}

/// Normalizes `HH:MM` or `HH:MM:SS` to `HH:MM:SS`.
pub fn normalize_time_of_day(value: &str) -> Option<String> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, "00"),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };

    let parse = |raw: &str, max: u32| -> Option<u32> {
        if raw.len() != 2 {
            return None;
        }
        raw.parse::<u32>().ok().filter(|value| *value <= max)
    };

    let hours = parse(hours, 23)?;
    let minutes = parse(minutes, 59)?;
    let seconds = parse(seconds, 59)?;
    Some(format!("{:02}:{:02}:{:02}", hours, minutes, seconds))
}

/// Property row ready to be written, after validation and normalization.
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub host_id: String,
    pub name: String,
    pub description: Option<String>,
    pub property_type_id: i64,
    pub availability_id: i64,
    pub address: String,
    pub city_id: i64,
    pub map_location: Option<String>,
    pub price: i64,
    pub min_night: i64,
    pub max_night: i64,
    pub check_in_time: String,
    pub check_out_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertyType {
    pub id: i64,
    pub name: String,
    pub icon_url: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: i64,
    pub name: String,
    pub display_order: i64,
    pub region_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AmenityCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub amenity_category_id: i64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAmenity {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Amenity name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Amenity icon is required"))]
    pub icon: String,

    #[serde(default)]
    #[validate(range(min = 1, message = "Amenity category is required"))]
    pub amenity_category_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub id: i64,
    pub name: String,
    pub icon_url: String,
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub property_id: i64,
    pub room_type_id: i64,
    pub availability_id: i64,
    pub capacity: Option<i64>,
    pub beds_count: Option<i64>,
    pub description: Option<String>,
}

/// Room create/update payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomForm {
    #[serde(default)]
    #[validate(range(min = 1, message = "Property is required"))]
    pub property_id: i64,

    #[serde(default)]
    #[validate(range(min = 1, message = "Room type is required"))]
    pub room_type_id: i64,

    #[serde(default, alias = "availibilityId")]
    #[validate(range(min = 1, message = "Availability must be a valid id"))]
    pub availability_id: Option<i64>,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i64>,

    #[validate(range(min = 0, message = "Beds count cannot be negative"))]
    pub beds_count: Option<i64>,

    pub description: Option<String>,
}

/// Room row ready to be written.
#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub property_id: i64,
    pub room_type_id: i64,
    pub availability_id: i64,
    pub capacity: Option<i64>,
    pub beds_count: Option<i64>,
    pub description: Option<String>,
}

/// Kind of entity a picture is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Property,
    Room,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Property => "Property",
            EntityType::Room => "Room",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "property" => Ok(EntityType::Property),
            "room" => Ok(EntityType::Room),
            other => Err(format!("Unknown entity type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PictureType {
    Icon,
    Regular,
}

impl PictureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PictureType::Icon => "Icon",
            PictureType::Regular => "Regular",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    pub id: i64,
    pub file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub picture_type: String,
    pub entity_id: i64,
    pub entity_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct CreatePicture {
    pub file_name: String,
    pub content_type: String,
    pub file_size: i64,
    pub picture_type: PictureType,
    pub entity_id: i64,
    pub entity_type: EntityType,
    pub url: String,
}
