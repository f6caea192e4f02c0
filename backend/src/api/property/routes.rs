//! Defines the HTTP routes for property management. Every route requires a
//! bearer token.

use super::handlers::{
    create_property, delete_property, get_property, list_properties, update_property,
};
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn property_router() -> Router {
    Router::new()
        .route("/", get(list_properties).post(create_property))
        .route(
            "/{id}",
            get(get_property)
                .put(update_property)
                .delete(delete_property),
        )
        .route_layer(middleware::from_fn(jwt_auth))
}
