// Authentication middleware for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::{error::AuthError, policy, token::TokenService};

/// Authenticated caller, built from a validated access token
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<String>,
}

/// Strip a `Bearer` scheme prefix, matching the scheme case-insensitively
pub fn strip_bearer(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("Bearer").then_some(rest)
}

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = strip_bearer(auth_header).ok_or(AuthError::InvalidToken)?.trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.validate_access_token(token)?;

    Ok(AuthenticatedUser {
        username: claims.sub,
        roles: claims.roles,
    })
}

/// Authenticated user extractor for protected routes
///
/// Reuses the identity `require_auth` already attached to the request, and
/// validates the header itself when the route is not behind that layer.
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let tokens = Arc::<TokenService>::from_ref(state);
        authenticate(&parts.headers, &tokens)
    }
}

/// Route guard: validates the access token, then applies the route policy
///
/// Missing or bad tokens are rejected with 401; a valid token whose roles
/// do not satisfy the matching policy rule is rejected with 403.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();
    let method = request.method().clone();

    let user = authenticate(request.headers(), &tokens).map_err(|e| {
        warn!("Rejected request to {} {}: {}", method, endpoint, e);
        e
    })?;

    if !policy::is_allowed(&method, &endpoint, &user.roles) {
        warn!(
            "Authorization failed: username={}, roles={:?}, method={}, endpoint={}",
            user.username, user.roles, method, endpoint
        );
        return Err(AuthError::InsufficientPermissions { endpoint });
    }

    debug!(
        "Authorization successful: username={}, method={}, endpoint={}",
        user.username, method, endpoint
    );
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
