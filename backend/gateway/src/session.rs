//! Cookie-backed session identifiers.
//!
//! The identifier is a random UUID in a signed cookie. A missing or tampered
//! cookie yields a fresh identifier, which is set on the response.

use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, SameSite},
};
use tracing::debug;

use prinix_core::SessionId;

pub const SESSION_COOKIE: &str = "prinix_session";

/// Existing identifier from the jar, or a new one added to it.
pub fn session_from_jar(jar: SignedCookieJar) -> (SignedCookieJar, SessionId) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return (jar, SessionId::from(value));
        }
    }

    let id = SessionId::generate();
    debug!(session = %id, "Issuing new session");
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(Some(SameSite::Lax));
    cookie.set_path("/");
    (jar.add(cookie), id)
}
