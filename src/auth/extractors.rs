use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{
    auth::{
        cookies::{read_bearer, read_cookie, ACCESS_COOKIE, REFRESH_COOKIE},
        repo_types::PublicUser,
    },
    error::AppError,
    state::AppState,
};

/// Caller authenticated by an access token.
///
/// The token comes from the `Authentication` cookie, or from an
/// `Authorization: Bearer` header when no cookie is sent.
pub struct AuthUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, ACCESS_COOKIE)
            .or_else(|| read_bearer(&parts.headers))
            .ok_or_else(|| AppError::Unauthorized("No authorization token was found".into()))?;

        let payload = state.auth.keys().verify_access(&token).map_err(|e| {
            warn!(error = %e, "invalid or expired access token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = state
            .auth
            .validate_bearer_subject(&payload.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
        Ok(AuthUser(user))
    }
}

/// Caller presenting a refresh token that matches the one stored for them.
pub struct RefreshUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, REFRESH_COOKIE)
            .ok_or_else(|| AppError::Unauthorized("No refresh token was found".into()))?;

        let payload = state.auth.keys().verify_refresh(&token).map_err(|e| {
            warn!(error = %e, "invalid or expired refresh token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        let user = state
            .auth
            .validate_refresh_match(&token, &payload.email)
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized("User not found or hash not correct".into())
            })?;
        Ok(RefreshUser(user))
    }
}
