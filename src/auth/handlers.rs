// HTTP handlers for authentication endpoints

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{AccountCredentials, CurrentUserResponse, TokenResponse},
    service::AuthService,
};
use crate::extract::{ApiJson, ApiPath};

/// Sign in with username and password
/// POST /auth/signin
pub async fn signin_handler(
    State(service): State<Arc<AuthService>>,
    ApiJson(credentials): ApiJson<AccountCredentials>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = service.sign_in(&credentials).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
/// PUT /auth/refresh/:username
///
/// The refresh token travels in the Authorization header, `Bearer ` optional.
pub async fn refresh_handler(
    State(service): State<Arc<AuthService>>,
    ApiPath(username): ApiPath<String>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AuthError> {
    let refresh_token = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    if refresh_token.trim().is_empty() {
        return Err(AuthError::MissingToken);
    }

    let response = service.refresh(&username, refresh_token).await?;
    Ok(Json(response))
}

/// Get the caller's identity (protected endpoint)
/// GET /auth/me
pub async fn me_handler(user: AuthenticatedUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        username: user.username,
        roles: user.roles,
    })
}
