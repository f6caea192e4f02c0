//! Collection of general utility functions.
//!
//! Token signing and password hashing helpers shared by the auth service and
//! the middleware.

pub mod jwt;
pub mod password;
