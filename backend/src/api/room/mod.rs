//! Room endpoints. Rooms hang off a property; writes need the property's host.

pub mod handlers;
pub mod routes;
