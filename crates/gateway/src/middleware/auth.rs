//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use common::{AppError, AppResult};
use domain::{IdentityUser, UserProfile, BEARER_TOKEN_PREFIX};

use crate::state::AppState;

/// Authenticated user resolved from the bearer token for one request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub IdentityUser);

impl CurrentUser {
    /// Profile view with the display name fallback applied.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(&self.0)
    }
}

/// Authentication middleware that verifies the token with the identity
/// provider.
///
/// Every provider failure is reported to the caller as the same
/// `InvalidToken` error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())?;
    if token.is_empty() {
        return Err(AppError::InvalidToken);
    }

    let user = state.identity.get_user(token).await.map_err(|e| {
        warn!("Token verification failed: {}", e);
        AppError::InvalidToken
    })?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Extract the bearer token: the first word after the `Bearer ` prefix.
fn extract_token(headers: &HeaderMap) -> AppResult<&str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingBearer)?;

    let rest = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::MissingBearer)?;

    Ok(rest.split(' ').next().unwrap_or_default())
}
