use std::time::Duration;

use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};

pub const ACCESS_COOKIE: &str = "Authentication";
pub const REFRESH_COOKIE: &str = "Refresh";

/// `HttpOnly` cookie scoped to the whole site.
pub fn format_cookie(name: &str, value: &str, max_age: Duration) -> String {
    format!(
        "{name}={value}; HttpOnly; Path=/; Max-Age={}",
        max_age.as_secs()
    )
}

/// Expires the access cookie immediately.
pub fn logout_cookie() -> String {
    format_cookie(ACCESS_COOKIE, "", Duration::ZERO)
}

/// Reads one cookie value out of the `Cookie` request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| val.trim().to_string())
        })
        .find(|val| !val.is_empty())
}

pub fn read_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .trim()
        .strip_prefix("Bearer ")
        .or_else(|| value.trim().strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
