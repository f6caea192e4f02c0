//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::user_service::UserService;
use crate::utils::jwt::{Claims, JwtUtils};
use crate::utils::password::PasswordHasher;
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

/// Authentication service for handling registration, login and token checks
pub struct AuthService<'a> {
    jwt_utils: &'a JwtUtils,
    user_service: UserService<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, jwt_utils: &'a JwtUtils, hasher: &'a PasswordHasher) -> Self {
        AuthService {
            jwt_utils,
            user_service: UserService::new(pool, hasher),
        }
    }

    /// Register a new user and issue a session token straight away
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let user = self.user_service.create_user(request).await?;
        let token = self.jwt_utils.generate_token(&user.id, &user.email)?;

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Authenticate user and generate a JWT token
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<AuthResponse> {
        if let Err(validation_errors) = login_request.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let user = self
            .user_service
            .authenticate_user(&login_request.email, &login_request.password)
            .await?;

        let token = self.jwt_utils.generate_token(&user.id, &user.email)?;
        info!("User {} logged in", user.id);

        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Resolve the user a set of already-validated claims refers to
    pub async fn current_user(&self, claims: &Claims) -> ServiceResult<UserProfile> {
        let user = self.user_service.get_user_required(claims.user_id()).await?;
        Ok(user.into())
    }

    /// Validate a raw token and load the current credential record behind it
    pub async fn verify(&self, token: &str) -> ServiceResult<UserProfile> {
        let claims = self.jwt_utils.validate_token(token)?;
        self.current_user(&claims).await
    }
}
