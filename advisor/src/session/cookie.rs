//! Session id detection from request cookies.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::models::SessionId;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "advisor_session";

/// Find a valid session id in the request's `Cookie` headers.
pub fn detect_session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}

/// Write a `Set-Cookie` header handing `id` to the client.
pub fn set_session_cookie(headers: &mut HeaderMap, id: SessionId) {
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.append(SET_COOKIE, value);
    }
}
