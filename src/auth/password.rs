// Password hashing and verification service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use std::sync::OnceLock;

use crate::auth::error::AuthError;

const MIN_PASSWORD_LEN: usize = 8;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    ///
    /// Returns a PHC string (`$argon2id$v=19$...`) carrying its own salt.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a stored PHC hash
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    /// The digest comparison inside argon2 is constant-time.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::PasswordHashError),
        }
    }

    /// Hash verified in place of a missing user's, so unknown usernames pay
    /// the same Argon2 cost as wrong passwords
    ///
    /// Computed once per process with the same parameters as stored hashes.
    pub fn dummy_hash() -> &'static str {
        static DUMMY_HASH: OnceLock<String> = OnceLock::new();
        DUMMY_HASH.get_or_init(|| {
            Self::hash_password("dummy-password-never-matches").unwrap_or_default()
        })
    }

    /// Validate password strength requirements
    pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidPasswordFormat(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    /// `hash_password` on the blocking thread pool
    pub async fn hash_password_blocking(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|_| AuthError::PasswordHashError)?
    }

    /// `verify_password` on the blocking thread pool
    pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|_| AuthError::PasswordHashError)?
    }
}
