//! Reference data seeding.
//!
//! Populates the lookup tables (availabilities, property types, cities,
//! amenity categories, amenities, room types) on first start.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

const AVAILABILITIES: &[&str] = &["Available", "Unavailable"];

const PROPERTY_TYPES: &[(&str, &str, i64)] = &[
    ("Apartment", "🏢", 1),
    ("House", "🏠", 2),
    ("Villa", "🏡", 3),
    ("Condo", "🏘️", 4),
    ("Studio", "🚪", 5),
    ("Cottage", "🛖", 6),
];

const CITIES: &[(&str, i64, i64)] = &[
    ("Batumi", 1, 1),
    ("Tbilisi", 2, 1),
    ("Kutaisi", 3, 2),
    ("Rustavi", 4, 3),
    ("Gori", 5, 3),
];

const AMENITY_CATEGORIES: &[&str] = &[
    "Kitchen & Dining",
    "Bathroom",
    "Entertainment",
    "Comfort",
    "Safety & Security",
];

/// (name, icon, category id); the category name is copied from the table above.
const AMENITIES: &[(&str, &str, i64)] = &[
    ("WiFi", "📶", 3),
    ("Kitchen", "🍳", 1),
    ("Coffee Maker", "☕", 1),
    ("Dishwasher", "🍽️", 1),
    ("Hot Water", "🚿", 2),
    ("Bathtub", "🛁", 2),
    ("Shower", "🚿", 2),
    ("TV", "📺", 3),
    ("Netflix", "🎬", 3),
    ("Board Games", "🎲", 3),
    ("Air Conditioning", "❄️", 4),
    ("Heating", "🔥", 4),
    ("Washer", "🧺", 4),
    ("Dryer", "🌀", 4),
    ("Smoke Detector", "🚨", 5),
    ("Fire Extinguisher", "🧯", 5),
];

const ROOM_TYPES: &[(&str, &str, i64)] = &[
    ("Bedroom", "🛏️", 1),
    ("Living Room", "🛋️", 2),
    ("Kitchen", "🍳", 3),
    ("Bathroom", "🚿", 4),
];

/// Seeds the reference tables. Does nothing when property types already exist.
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM property_types")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!("Reference data already seeded");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for name in AVAILABILITIES {
        sqlx::query("INSERT INTO availabilities (name) VALUES (?)")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }

    for (name, icon_url, display_order) in PROPERTY_TYPES {
        sqlx::query("INSERT INTO property_types (name, icon_url, display_order) VALUES (?, ?, ?)")
            .bind(*name)
            .bind(*icon_url)
            .bind(*display_order)
            .execute(&mut *tx)
            .await?;
    }

    for (name, display_order, region_id) in CITIES {
        sqlx::query("INSERT INTO cities (name, display_order, region_id) VALUES (?, ?, ?)")
            .bind(*name)
            .bind(*display_order)
            .bind(*region_id)
            .execute(&mut *tx)
            .await?;
    }

    for name in AMENITY_CATEGORIES {
        sqlx::query("INSERT INTO amenity_categories (name) VALUES (?)")
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }

    for (name, icon, category_id) in AMENITIES {
        let category = AMENITY_CATEGORIES
            .get((*category_id - 1) as usize)
            .copied();
        sqlx::query(
            "INSERT INTO amenities (name, icon, amenity_category_id, category) VALUES (?, ?, ?, ?)",
        )
        .bind(*name)
        .bind(*icon)
        .bind(*category_id)
        .bind(category)
        .execute(&mut *tx)
        .await?;
    }

    for (name, icon_url, display_order) in ROOM_TYPES {
        sqlx::query("INSERT INTO room_types (name, icon_url, display_order) VALUES (?, ?, ?)")
            .bind(*name)
            .bind(*icon_url)
            .bind(*display_order)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!("Reference data seeded");
    Ok(())
}
