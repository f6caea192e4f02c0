//! Defines the HTTP routes for rooms. Every route requires a bearer token.

use super::handlers::{create_room, delete_room, get_room, list_rooms_by_property, update_room};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn room_router() -> Router {
    Router::new()
        .route("/", post(create_room))
        .route("/property/{property_id}", get(list_rooms_by_property))
        .route("/{id}", get(get_room).put(update_room).delete(delete_room))
        .route_layer(middleware::from_fn(jwt_auth))
}
