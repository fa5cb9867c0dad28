//! Cookie builders for the user session and the admin refresh token.
//!
//! Both cookies are HttpOnly, Secure, SameSite=Lax with a 7-day Max-Age.
//! The refresh-token cookie is scoped to `/admin/auth` so it only travels
//! on the refresh and logout calls.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the opaque user session token.
pub const TRENZO_SESSION: &str = "trenzo_session";

/// Cookie name for the admin refresh token.
pub const TRENZO_REFRESH_TOKEN: &str = "trenzo_refresh_token";

/// Session lifetime in seconds (7 days). The stored row carries the same
/// expiry; the cookie Max-Age is a courtesy, the row is authoritative.
pub const SESSION_EXP: u64 = 604_800;

/// Refresh-token lifetime in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604_800;

/// Set the user session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use trenzo_auth_types::cookie::{set_session_cookie, TRENZO_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string());
/// let cookie = jar.get(TRENZO_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((TRENZO_SESSION, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Set the admin refresh-token cookie on the jar.
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((TRENZO_REFRESH_TOKEN, value))
        .path("/admin/auth")
        .domain(domain)
        .max_age(Duration::seconds(REFRESH_TOKEN_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the user session cookie by setting Max-Age to 0.
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((TRENZO_SESSION, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the admin refresh-token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use trenzo_auth_types::cookie::{
///     clear_refresh_token_cookie, set_refresh_token_cookie, TRENZO_REFRESH_TOKEN,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(jar, "r".to_string(), "example.com".to_string());
/// let jar = clear_refresh_token_cookie(jar, "example.com".to_string());
/// let cookie = jar.get(TRENZO_REFRESH_TOKEN).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_refresh_token_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((TRENZO_REFRESH_TOKEN, ""))
        .path("/admin/auth")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
