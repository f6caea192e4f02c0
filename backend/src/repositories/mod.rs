//! Data access layer. Each repository borrows the shared pool and returns
//! `anyhow::Result`, leaving domain errors to the services.

pub mod catalog_repository;
pub mod picture_repository;
pub mod property_repository;
pub mod room_repository;
pub mod user_repository;
