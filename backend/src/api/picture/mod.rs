//! Picture upload endpoints for properties and rooms.

pub mod handlers;
pub mod routes;
