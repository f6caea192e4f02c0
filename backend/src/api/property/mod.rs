//! Property management endpoints: list, read, create, update and delete a
//! host's properties.

pub mod handlers;
pub mod routes;
