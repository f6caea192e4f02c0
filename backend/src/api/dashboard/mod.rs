//! Dashboard summary endpoint.

pub mod handlers;
pub mod routes;
