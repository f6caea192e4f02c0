//! User business logic service.
//!
//! Handles credential records: registration, credential checks and lookups.

use crate::auth::models::RegisterRequest;
use crate::database::models::{CreateUser, DEFAULT_USER_TYPE, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::password::PasswordHasher;
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

/// Message shared by every credential failure so callers cannot tell an
/// unknown email from a wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    hasher: &'a PasswordHasher,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `hasher` - Password hasher configured with the bcrypt cost
    pub fn new(pool: &'a SqlitePool, hasher: &'a PasswordHasher) -> Self {
        Self { pool, hasher }
    }

    /// Creates a new user with full validation.
    ///
    /// # Returns
    /// The newly created User with all fields populated
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - An existing user with the same email
    pub async fn create_user(&self, registration: RegisterRequest) -> ServiceResult<User> {
        let registration = RegisterRequest {
            email: registration.email.trim().to_lowercase(),
            first_name: non_blank(registration.first_name),
            last_name: non_blank(registration.last_name),
            ..registration
        };

        if let Err(validation_errors) = registration.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let repo = UserRepository::new(self.pool);

        if repo.get_user_by_email(&registration.email).await?.is_some() {
            return Err(ServiceError::already_exists("User", &registration.email));
        }

        let password_hash = self.hasher.hash_password(&registration.password)?;

        let data = CreateUser {
            username: username_from_email(&registration.email),
            email: registration.email.clone(),
            password_hash,
            first_name: registration.first_name,
            last_name: registration.last_name,
            user_type: DEFAULT_USER_TYPE.to_string(),
        };

        // A concurrent registration can still win the race to the UNIQUE index.
        let user = repo.create_user(data).await.map_err(|error| {
            let unique_violation = error
                .downcast_ref::<sqlx::Error>()
                .and_then(|e| e.as_database_error())
                .is_some_and(|e| e.is_unique_violation());
            if unique_violation {
                ServiceError::already_exists("User", &registration.email)
            } else {
                ServiceError::from(error)
            }
        })?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Checks an email/password pair against the stored credential record.
    ///
    /// # Errors
    /// Returns `ServiceError::Unauthenticated` with the same message whether
    /// the email is unknown or the password does not match.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let email = email.trim().to_lowercase();

        let Some(user) = repo.get_user_by_email(&email).await? else {
            self.hasher.verify_against_dummy(password);
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The part of the email before `@`.
fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: Some("Nino".to_string()),
            last_name: Some("Beridze".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_derives_username() {
        let pool = test_pool().await;
        let hasher = PasswordHasher::new(4).unwrap();
        let service = UserService::new(&pool, &hasher);

        let user = service
            .create_user(registration("  Nino@Example.com ", "secret1"))
            .await
            .unwrap();

        assert_eq!(user.email, "nino@example.com");
        assert_eq!(user.username, "nino");
        assert_eq!(user.user_type, "Host");
        assert_ne!(user.password_hash, "secret1");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts_and_keeps_original() {
        let pool = test_pool().await;
        let hasher = PasswordHasher::new(4).unwrap();
        let service = UserService::new(&pool, &hasher);

        let original = service
            .create_user(registration("host@example.com", "secret1"))
            .await
            .unwrap();

        let duplicate = service
            .create_user(registration("HOST@example.com", "another-secret"))
            .await;
        assert!(matches!(duplicate, Err(ServiceError::AlreadyExists { .. })));

        let stored = service.get_user_required(&original.id).await.unwrap();
        assert_eq!(stored.password_hash, original.password_hash);
        assert!(
            service
                .authenticate_user("host@example.com", "secret1")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_authentication_failures_are_indistinguishable() {
        let pool = test_pool().await;
        let hasher = PasswordHasher::new(4).unwrap();
        let service = UserService::new(&pool, &hasher);
        service
            .create_user(registration("host@example.com", "secret1"))
            .await
            .unwrap();

        let wrong_password = service
            .authenticate_user("host@example.com", "wrong-secret")
            .await
            .unwrap_err();
        let unknown_email = service
            .authenticate_user("ghost@example.com", "secret1")
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, ServiceError::Unauthenticated { .. }));
        assert!(matches!(unknown_email, ServiceError::Unauthenticated { .. }));
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let pool = test_pool().await;
        let hasher = PasswordHasher::new(4).unwrap();
        let service = UserService::new(&pool, &hasher);

        for (email, password) in [("", "secret1"), ("not-an-email", "secret1"), ("a@b.co", "123")] {
            let result = service.create_user(registration(email, password)).await;
            assert!(
                matches!(result, Err(ServiceError::Validation { .. })),
                "expected validation error for {email:?}/{password:?}"
            );
        }
    }
}
