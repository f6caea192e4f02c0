use super::handlers::get_summary;
use crate::auth::middleware::jwt_auth;
use axum::{Router, middleware, routing::get};

pub fn dashboard_router() -> Router {
    Router::new().route("/summary", get(get_summary).layer(middleware::from_fn(jwt_auth)))
}
