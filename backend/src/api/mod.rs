//! Central module for organizing the application's catalogue API endpoints.
//!
//! Each submodule owns one resource under `/api`. Authentication routes live
//! in `crate::auth` and are mounted separately.

pub mod catalog;
pub mod common;
pub mod dashboard;
pub mod picture;
pub mod property;
pub mod room;
