// Authentication service - business logic layer

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::strip_bearer,
    models::{AccountCredentials, TokenResponse, User},
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
};

/// Authentication service coordinating sign-in and token refresh
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    dummy_hash: String,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            tokens,
            dummy_hash: PasswordService::dummy_hash().to_string(),
        }
    }

    /// Check a username and password against the stored identity
    ///
    /// Unknown usernames fail with `UserNotFound` after a verification
    /// against a dummy hash, so they cost as much as a wrong password. A wrong
    /// password or an account that is disabled, locked or expired fails with
    /// `InvalidCredentials`. The password is checked before the account flags.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            PasswordService::verify_password_blocking(
                password.to_string(),
                self.dummy_hash.clone(),
            )
            .await?;
            return Err(AuthError::UserNotFound(username.to_string()));
        };

        let matches = PasswordService::verify_password_blocking(
            password.to_string(),
            user.password_hash.clone(),
        )
        .await?;

        if !matches || !user.is_usable() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Sign in with a username and password
    pub async fn sign_in(&self, credentials: &AccountCredentials) -> Result<TokenResponse, AuthError> {
        credentials.validate()?;

        let username = credentials.username.as_str();
        match self.verify_credentials(username, &credentials.password).await {
            Ok(user) => {
                info!(username = %username, "Sign-in succeeded");
                self.issue_for(&user)
            }
            Err(e) => {
                warn!(username = %username, outcome = %e.kind(), "Sign-in failed");
                Err(e)
            }
        }
    }

    /// Trade a refresh token for a fresh token pair
    ///
    /// The token may carry a `Bearer ` prefix in any letter case. Its subject
    /// must match `username`, and roles come from the identity as stored now.
    pub async fn refresh(
        &self,
        username: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse, AuthError> {
        let raw = refresh_token.trim();
        let raw = strip_bearer(raw).unwrap_or(raw).trim();

        let claims = self.tokens.validate_refresh_token(raw).map_err(|e| {
            warn!(username = %username, outcome = %e.kind(), "Token refresh rejected");
            e
        })?;

        if claims.sub != username {
            warn!(username = %username, "Refresh token subject does not match username");
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;

        if !user.is_usable() {
            warn!(username = %username, "Token refresh for unusable account");
            return Err(AuthError::InvalidCredentials);
        }

        info!(username = %username, "Tokens refreshed");
        self.issue_for(&user)
    }

    fn issue_for(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let pair = self.tokens.generate_token_pair(&user.user_name, &user.roles)?;

        Ok(TokenResponse {
            username: user.user_name.clone(),
            authenticated: true,
            created: to_datetime(pair.access.issued_at)?,
            expiration: to_datetime(pair.access.expires_at)?,
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
        })
    }
}

fn to_datetime(timestamp: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or_else(|| {
        AuthError::TokenGenerationError(format!("timestamp {} out of range", timestamp))
    })
}
