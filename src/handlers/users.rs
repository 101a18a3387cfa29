//! User resource manager: registration, sessions and user CRUD.

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{self, cookie, password, Claims};
use crate::config;
use crate::database::{self, models::user::{Role, UserPayload}, DatabaseError};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::validation;

/// Unique constraint backing the users email column
const EMAIL_CONSTRAINT: &str = "users_email_key";

fn parse_user_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::not_found(format!("No user with id : {}", id)))
}

/// The first ever registered account becomes the admin; nobody else is
/// granted the role at registration time.
fn bootstrap_role(existing_users: i64) -> Role {
    if existing_users == 0 {
        Role::Admin
    } else {
        Role::User
    }
}

fn hash_password(plaintext: &str) -> Result<String, ApiError> {
    password::hash(plaintext).map_err(|err| {
        tracing::error!("Password hashing failed: {}", err);
        ApiError::internal("Internal Server Error")
    })
}

/// POST /users - register a new account
pub async fn register(Json(body): Json<Value>) -> Result<(StatusCode, Json<Value>), ApiError> {
    validation::validate(validation::USER_SCHEMA, &body)
        .map_err(|v| ApiError::Validation(v.first_message()))?;
    let payload: UserPayload =
        serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;

    let pool = database::pool().await?;

    if database::users::email_exists(pool, &payload.email).await? {
        return Err(ApiError::DuplicateEmail);
    }

    let role = bootstrap_role(database::users::count(pool).await?);

    let password_hash = hash_password(&payload.password)?;
    let user = payload.into_user(Uuid::new_v4(), role, password_hash);

    match database::users::insert(pool, &user).await {
        Ok(()) => {}
        // Lost a registration race on the same email
        Err(DatabaseError::UniqueViolation { ref constraint }) if constraint == EMAIL_CONSTRAINT => {
            return Err(ApiError::DuplicateEmail);
        }
        Err(err) => return Err(err.into()),
    }

    tracing::info!("Registered user {} with role {:?}", user.id, user.role);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "User Registered Successfully!" })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// POST /users/login - authenticate and open a session
pub async fn login(
    Json(body): Json<LoginRequest>,
) -> Result<(SignedCookieJar, Json<Value>), ApiError> {
    let (email, plaintext) = match (body.email, body.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::bad_request("Please provide email and password")),
    };

    let pool = database::pool().await?;

    // Unknown email and wrong password are indistinguishable to the caller
    let user = database::users::find_by_email(pool, &email)
        .await?
        .filter(|user| password::verify(&plaintext, &user.password))
        .ok_or_else(|| ApiError::authentication("Invalid credentials"))?;

    let security = &config::config().security;
    let claims = Claims::new(&user, security.token_expiry_hours);
    let token = auth::issue_token(security, &claims).map_err(|err| {
        tracing::error!("Token issuance failed: {}", err);
        ApiError::internal("Internal Server Error")
    })?;

    let jar = SignedCookieJar::new(cookie::signing_key(security))
        .add(cookie::session_cookie(security, token.clone()));

    Ok((jar, Json(json!({ "token": token }))))
}

/// DELETE /users/logout - clear the session cookie. Always succeeds; the
/// token itself stays valid until its embedded expiry.
pub async fn logout() -> (SignedCookieJar, Json<Value>) {
    let security = &config::config().security;
    let jar = SignedCookieJar::new(cookie::signing_key(security)).add(cookie::expired_cookie());

    (jar, Json(json!({ "msg": "user logged out!" })))
}

/// GET /users - list all users (admin gate applied in the router)
pub async fn list() -> Result<Json<Value>, ApiError> {
    let pool = database::pool().await?;
    let users = database::users::list(pool).await?;
    Ok(Json(json!({ "users": users })))
}

/// GET /users/:id - fetch one user, visible to the subject and admins
pub async fn get_one(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_user_id(&id)?;

    if !caller.can_act_on(user_id) {
        return Err(ApiError::authorization("Not Authorized!"));
    }

    let pool = database::pool().await?;
    let user = database::users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user with id : {}", id)))?;

    Ok(Json(json!({ "user": user })))
}

/// PUT /users/:id - full update. Only the subject themself; admins are
/// deliberately excluded here, unlike delete.
pub async fn update(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_user_id(&id)?;

    if caller.user_id != user_id {
        return Err(ApiError::authorization("Not Authorized"));
    }

    validation::validate(validation::USER_SCHEMA, &body)
        .map_err(|v| ApiError::Validation(v.first_message()))?;
    let payload: UserPayload =
        serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))?;

    let pool = database::pool().await?;
    let existing = database::users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user with id : {}", id)))?;

    let password_hash = hash_password(&payload.password)?;
    let updated = payload.apply_to(&existing, password_hash);

    match database::users::update(pool, &updated).await {
        Ok(()) => {}
        Err(DatabaseError::UniqueViolation { ref constraint }) if constraint == EMAIL_CONSTRAINT => {
            return Err(ApiError::DuplicateEmail);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(Json(json!({ "user": updated })))
}

/// PATCH /users/:id - toggle the business flag. Subject only.
pub async fn update_status(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    validation::validate(validation::STATUS_SCHEMA, &body)
        .map_err(|v| ApiError::Validation(v.first_message()))?;

    let user_id = parse_user_id(&id)?;
    if caller.user_id != user_id {
        return Err(ApiError::authorization("Not Authorized!"));
    }

    let pool = database::pool().await?;
    let mut user = database::users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user with id : {}", id)))?;

    user.is_business = body
        .get("isBusiness")
        .and_then(Value::as_bool)
        .unwrap_or(user.is_business);
    user.updated_at = chrono::Utc::now();

    database::users::update(pool, &user).await?;

    Ok(Json(json!({ "user": user })))
}

/// DELETE /users/:id - remove a user (subject or admin) and their cards
pub async fn remove(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_user_id(&id)?;

    let pool = database::pool().await?;
    let user = database::users::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user with id : {}", id)))?;

    if !caller.can_act_on(user_id) {
        return Err(ApiError::authorization("Not Authorized!"));
    }

    database::users::delete_cascade(pool, user_id).await?;

    Ok(Json(json!({ "msg": "Success! User Deleted.", "user": user })))
}
