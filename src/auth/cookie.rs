//! Session cookie transport.
//!
//! The JWT rides in an HTTP-only cookie that is itself signed by the cookie
//! jar, separately from the JWT signature. Logout overwrites the cookie
//! with an immediately-expired placeholder; the token is never revoked
//! server-side and stays valid until its embedded expiry.

use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use sha2::{Digest, Sha512};

use crate::config::SecurityConfig;

pub const SESSION_COOKIE: &str = "token";

/// Key for the signed cookie jar, stretched from the configured secret.
/// SHA-512 yields exactly the 64 bytes of key material the jar requires.
pub fn signing_key(security: &SecurityConfig) -> Key {
    let digest = Sha512::digest(security.effective_cookie_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Session cookie carrying a freshly issued token
pub fn session_cookie(security: &SecurityConfig, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(security.secure_cookies);
    cookie.set_same_site(SameSite::None);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::hours(security.token_expiry_hours));
    cookie
}

/// Placeholder cookie that expires immediately, clearing the session
pub fn expired_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "logout");
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}
