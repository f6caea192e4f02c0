//! Defines the reference data routes. They sit directly under `/api` and all
//! require a bearer token.

use super::handlers::*;
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn catalog_router() -> Router {
    Router::new()
        .route("/propertytype", get(list_property_types))
        .route("/city", get(list_cities))
        .route("/amenity", get(list_amenities).post(create_amenity))
        .route("/amenity-category", get(list_amenity_categories))
        .route("/roomtype", get(list_room_types))
        .route("/availability", get(list_availabilities))
        .route_layer(middleware::from_fn(jwt_auth))
}
