// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use tracing::{debug, error, warn};

use crate::error::ErrorResponse;

/// Authentication and authorization error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Authentication errors
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// No identity is stored under the username
    #[error("No identity found for username '{0}'")]
    UserNotFound(String),

    /// Password mismatch, or an account that is disabled, locked or expired
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Missing authentication token")]
    MissingToken,

    /// Bad signature, malformed token, wrong issuer or wrong token type
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Invalid password: {0}")]
    InvalidPasswordFormat(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    // Authorization errors
    /// Caller holds none of the roles the route requires
    #[error("Insufficient permissions for {endpoint}")]
    InsufficientPermissions { endpoint: String },
}

/// Coarse classification of an auth failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    BadRequest,
    NotFound,
    InvalidCredentials,
    Unauthorized,
    Forbidden,
    Conflict,
    Internal,
}

impl fmt::Display for AuthFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthFailureKind::BadRequest => "bad_request",
            AuthFailureKind::NotFound => "not_found",
            AuthFailureKind::InvalidCredentials => "invalid_credentials",
            AuthFailureKind::Unauthorized => "unauthorized",
            AuthFailureKind::Forbidden => "forbidden",
            AuthFailureKind::Conflict => "conflict",
            AuthFailureKind::Internal => "internal",
        };
        write!(f, "{}", s)
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl AuthError {
    pub fn kind(&self) -> AuthFailureKind {
        match self {
            AuthError::ValidationError(_) | AuthError::InvalidPasswordFormat(_) => {
                AuthFailureKind::BadRequest
            }
            AuthError::UserNotFound(_) => AuthFailureKind::NotFound,
            AuthError::InvalidCredentials => AuthFailureKind::InvalidCredentials,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                AuthFailureKind::Unauthorized
            }
            AuthError::InsufficientPermissions { .. } => AuthFailureKind::Forbidden,
            AuthError::UsernameTaken(_) => AuthFailureKind::Conflict,
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_) => AuthFailureKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// Unknown user, bad credentials and token failures all map to 401 so a
    /// client cannot tell which check failed.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            AuthFailureKind::BadRequest => StatusCode::BAD_REQUEST,
            AuthFailureKind::NotFound
            | AuthFailureKind::InvalidCredentials
            | AuthFailureKind::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthFailureKind::Forbidden => StatusCode::FORBIDDEN,
            AuthFailureKind::Conflict => StatusCode::CONFLICT,
            AuthFailureKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self.kind() {
            AuthFailureKind::BadRequest => {
                debug!("Rejected auth request: {}", self);
                match self {
                    AuthError::ValidationError(errors) => {
                        ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                            .with_details(
                                serde_json::to_value(errors).unwrap_or(serde_json::json!({})),
                            )
                    }
                    other => ErrorResponse::new("VALIDATION_ERROR", other.to_string()),
                }
            }
            AuthFailureKind::NotFound
            | AuthFailureKind::InvalidCredentials
            | AuthFailureKind::Unauthorized => {
                warn!(kind = %self.kind(), "Authentication failed");
                debug!("Authentication failure detail: {}", self);
                ErrorResponse::new("AUTHENTICATION_FAILED", "Authentication failed")
            }
            AuthFailureKind::Forbidden => {
                warn!("Authorization failed: {}", self);
                ErrorResponse::new("FORBIDDEN", "Insufficient permissions")
            }
            AuthFailureKind::Conflict => ErrorResponse::new("CONFLICT", self.to_string()),
            AuthFailureKind::Internal => {
                error!("Internal auth error: {}", self);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.to_error_response())).into_response()
    }
}
