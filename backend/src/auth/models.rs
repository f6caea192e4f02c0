//! Data structures for authentication-related entities.
//!
//! This module defines the request and response payloads of the auth
//! endpoints and the public user profile, which never carries the password
//! hash.

use crate::database::models::{User, validate_not_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        email(message = "Must be a valid email"),
        length(min = 1, max = 255, message = "Email must be between 1-255 characters")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "validate_not_blank")
    )]
    pub password: String,

    #[validate(length(max = 255, message = "First name too long"))]
    pub first_name: Option<String>,

    #[validate(length(max = 255, message = "Last name too long"))]
    pub last_name: Option<String>,
}

/// Login request payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub password: String,
}

/// User information returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            user_type: user.user_type,
            created_at: user.created_at,
        }
    }
}

/// Login and registration response containing the session token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Response of the current-user endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

/// Acknowledgement returned by logout
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}
