//! Reference data endpoints used to fill property and room forms.

pub mod handlers;
pub mod routes;
