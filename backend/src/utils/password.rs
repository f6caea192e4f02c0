//! Salted password hashing with bcrypt.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{hash, verify};

/// Hashes and verifies passwords at a fixed bcrypt cost.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Compared against when the account does not exist, so unknown emails
    /// cost as much as wrong passwords.
    dummy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> ServiceResult<Self> {
        let dummy_hash = hash("propdash-dummy-password", cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))?;
        Ok(Self { cost, dummy_hash })
    }

    /// Function to hash a password before storing in database
    pub fn hash_password(&self, password: &str) -> ServiceResult<String> {
        hash(password, self.cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    ///
    /// # Returns
    /// `true` if password matches hash, `false` otherwise
    pub fn verify_password(&self, password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }

    /// Burns one verification against the dummy hash; the result is ignored.
    pub fn verify_against_dummy(&self, password: &str) {
        let _ = verify(password, &self.dummy_hash);
    }
}
