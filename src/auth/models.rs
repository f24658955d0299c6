// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_MANAGER: &str = "MANAGER";
pub const ROLE_COMMON_USER: &str = "COMMON_USER";

/// Stored identity with its role names
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub full_name: String,
    pub password_hash: String,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub enabled: bool,
    pub roles: Vec<String>,
}

impl User {
    /// True when no account flag blocks authentication
    pub fn is_usable(&self) -> bool {
        self.enabled
            && self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
    }
}

/// Sign-in request body
#[derive(Clone, Deserialize, Validate)]
pub struct AccountCredentials {
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub username: String,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub password: String,
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token pair handed back by sign-in and refresh
///
/// `created` and `expiration` describe the access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub username: String,
    pub authenticated: bool,
    pub created: DateTime<Utc>,
    pub expiration: DateTime<Utc>,
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity of the caller as seen by protected handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub roles: Vec<String>,
}
