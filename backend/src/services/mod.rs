//! Module for core business logic services.
//!
//! Services validate input, enforce ownership and orchestrate the
//! repositories. Each one borrows the shared pool for the span of a request.

pub mod catalog_service;
pub mod dashboard_service;
pub mod picture_service;
pub mod property_service;
pub mod room_service;
pub mod user_service;
