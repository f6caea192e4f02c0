//! Authentication module for host accounts and session tokens.
//!
//! This module provides the public interface for registration, login, token
//! verification and the middleware that guards every protected route.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
