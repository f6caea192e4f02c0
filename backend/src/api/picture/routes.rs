//! Defines the picture routes. Every route requires a bearer token.

use super::handlers::{delete_picture, list_pictures, upload_icon, upload_regular};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

pub fn picture_router() -> Router {
    // The router allows one parameter name per path position, so `{key}` is
    // the picture id on DELETE and the entity type on GET.
    Router::new()
        .route("/regular", post(upload_regular))
        .route("/icon", post(upload_icon))
        .route("/{key}/{entity_id}", get(list_pictures))
        .route("/{key}", delete(delete_picture))
        .route_layer(middleware::from_fn(jwt_auth))
}
