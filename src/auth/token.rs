// JWT token generation and validation service

use crate::auth::error::AuthError;
use crate::config::JwtSettings;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which half of a token pair a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    /// Role names; only access tokens carry them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
    pub iss: String,
    pub jti: String,
    pub token_type: TokenType,
}

/// A signed token with the timestamps it was minted with
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Token service for JWT operations
///
/// Keys and the validation profile are built once from the configured
/// secret. Tokens are HS256 signed and stateless: nothing is persisted, so
/// an issued token stays valid until it expires.
pub struct TokenService {
    issuer: String,
    access_token_ttl: i64,  // in seconds
    refresh_token_ttl: i64, // in seconds
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand against an explicit clock
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            issuer: settings.issuer.clone(),
            access_token_ttl: settings.access_token_ttl_secs,
            refresh_token_ttl: settings.refresh_token_ttl_secs,
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
        }
    }

    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl_secs(&self) -> i64 {
        self.refresh_token_ttl
    }

    /// Generate an access token carrying the caller's roles
    pub fn generate_access_token(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<IssuedToken, AuthError> {
        self.issue_at(username, roles, TokenType::Access, Utc::now().timestamp())
    }

    /// Generate a refresh token; roles are re-read from the store on refresh
    pub fn generate_refresh_token(&self, username: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(username, &[], TokenType::Refresh, Utc::now().timestamp())
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(
        &self,
        username: &str,
        roles: &[String],
    ) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.generate_access_token(username, roles)?,
            refresh: self.generate_refresh_token(username)?,
        })
    }

    /// Validate an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, TokenType::Access, Utc::now().timestamp())
    }

    /// Validate a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, TokenType::Refresh, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(
        &self,
        username: &str,
        roles: &[String],
        token_type: TokenType,
        now: i64,
    ) -> Result<IssuedToken, AuthError> {
        let ttl = match token_type {
            TokenType::Access => self.access_token_ttl,
            TokenType::Refresh => self.refresh_token_ttl,
        };
        let exp = now + ttl;

        let claims = Claims {
            sub: username.to_string(),
            roles: roles.to_vec(),
            iat: now,
            exp,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at: exp,
        })
    }

    /// Validates signature, issuer and token type, then expiry against `now`
    ///
    /// A token is still accepted at exactly `exp` and rejected one second later.
    pub(crate) fn validate_at(
        &self,
        token: &str,
        expected: TokenType,
        now: i64,
    ) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })?;

        if claims.token_type != expected {
            tracing::debug!(
                "Token type mismatch: expected {:?}, got {:?}",
                expected,
                claims.token_type
            );
            return Err(AuthError::InvalidToken);
        }

        if now > claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}
