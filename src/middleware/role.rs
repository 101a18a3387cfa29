use axum::{extract::Request, middleware::Next, response::Response};

use super::auth::AuthUser;
use crate::error::ApiError;

/// Role gate, layered after authentication. Callers whose role is not in
/// the permitted set are refused; this API answers with 401 rather than
/// the conventional 403.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::authentication("Authentication invalid"))?;

    if !user.is_admin() {
        tracing::warn!("User {} denied access to admin route", user.user_id);
        return Err(ApiError::authorization("Unauthorized to access this route"));
    }

    Ok(next.run(request).await)
}
