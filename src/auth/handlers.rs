use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::AppendHeaders,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{IsAuthResponse, LoginRequest, MessageResponse, RegisterRequest},
        extractors::{AuthUser, RefreshUser},
        repo_types::NewUser,
    },
    error::{AppError, AppResult},
    state::AppState,
};

type CookieHeaders = AppendHeaders<Vec<(axum::http::HeaderName, String)>>;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/is_authenticated", get(is_authenticated))
        .route("/auth/refresh", get(refresh))
}

fn set_cookies(cookies: Vec<String>) -> CookieHeaders {
    AppendHeaders(cookies.into_iter().map(|c| (SET_COOKIE, c)).collect())
}

/// Access and refresh cookies for a freshly authenticated email.
async fn session_cookies(state: &AppState, email: &str) -> AppResult<CookieHeaders> {
    let access = state.auth.access_cookie(email)?;
    let refresh = state.auth.refresh_cookie(email).await?;
    Ok(set_cookies(vec![access, refresh]))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, CookieHeaders, Json<MessageResponse>)> {
    payload.validate()?;

    let user = state
        .auth
        .register(NewUser {
            email: payload.email,
            name: payload.name,
            password: payload.password,
        })
        .await?;

    let cookies = session_cookies(&state, &user.email).await?;
    Ok((
        StatusCode::CREATED,
        cookies,
        Json(MessageResponse {
            message: "Successfully registered",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<(CookieHeaders, Json<MessageResponse>)> {
    payload.validate()?;

    let user = state
        .auth
        .validate_credentials(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    let cookies = session_cookies(&state, &user.email).await?;
    Ok((
        cookies,
        Json(MessageResponse {
            message: "Login successful",
        }),
    ))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> (CookieHeaders, Json<MessageResponse>) {
    (
        set_cookies(vec![state.auth.logout()]),
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn is_authenticated(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<IsAuthResponse>> {
    let found = state.auth.is_authenticated(&user.email).await?;
    Ok(Json(IsAuthResponse {
        email: found.map(|u| u.email).unwrap_or_default(),
    }))
}

#[instrument(skip(state, user), fields(email = %user.email))]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser(user): RefreshUser,
) -> AppResult<(CookieHeaders, Json<MessageResponse>)> {
    let access = state.auth.access_cookie(&user.email)?;
    Ok((
        set_cookies(vec![access]),
        Json(MessageResponse {
            message: "Refresh successful",
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn set_cookies_appends_one_header_per_cookie() {
        let res = (
            set_cookies(vec!["a=1".into(), "b=2".into()]),
            Json(MessageResponse { message: "ok" }),
        )
            .into_response();
        let cookies: Vec<_> = res
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }

    #[test]
    fn is_auth_response_serialization() {
        let json = serde_json::to_string(&IsAuthResponse {
            email: "test@example.com".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"email":"test@example.com"}"#);
    }
}
