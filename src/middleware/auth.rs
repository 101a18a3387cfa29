use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::SignedCookieJar;
use uuid::Uuid;

use crate::auth::{self, cookie, Claims};
use crate::config;
use crate::database::models::user::{PersonName, Role};
use crate::error::ApiError;

/// Authenticated caller context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: PersonName,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Ownership gate: admins may act on any resource, everyone else only
    /// on resources they own
    pub fn can_act_on(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

/// Authentication middleware: verifies the signed session cookie and its
/// JWT, then injects the caller context. Requests without a valid token are
/// halted here and never reach a handler.
pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let security = &config::config().security;

    let jar = SignedCookieJar::from_headers(request.headers(), cookie::signing_key(security));
    let token = jar
        .get(cookie::SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::authentication("Authentication invalid"))?;

    let claims = auth::verify_token(security, &token).map_err(|err| {
        tracing::warn!("Token verification failed: {}", err);
        ApiError::authentication("Authentication invalid")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
