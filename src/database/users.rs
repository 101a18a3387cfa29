//! User document store.
//!
//! The credential hash is kept in its own column, outside the JSONB
//! document, so a serialized document can never carry it.

use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use super::models::user::User;
use super::{classify, DatabaseError};

fn row_to_user(row: &PgRow) -> Result<User, DatabaseError> {
    let doc: Value = row.try_get("doc").map_err(DatabaseError::Sqlx)?;
    let mut user: User = serde_json::from_value(doc)?;
    user.password = row.try_get("password").map_err(DatabaseError::Sqlx)?;
    Ok(user)
}

pub async fn count(pool: &PgPool) -> Result<i64, DatabaseError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::Sqlx)
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, DatabaseError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;
    Ok(exists)
}

pub async fn insert(pool: &PgPool, user: &User) -> Result<(), DatabaseError> {
    let doc = serde_json::to_value(user)?;

    sqlx::query(
        "INSERT INTO users (id, email, password, doc, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&doc)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(classify)?;

    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let row = sqlx::query("SELECT doc, password FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    row.as_ref().map(row_to_user).transpose()
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DatabaseError> {
    let row = sqlx::query("SELECT doc, password FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    row.as_ref().map(row_to_user).transpose()
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
    let rows = sqlx::query("SELECT doc, password FROM users ORDER BY created_at")
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    rows.iter().map(row_to_user).collect()
}

/// Replace a user's document and extracted columns
pub async fn update(pool: &PgPool, user: &User) -> Result<(), DatabaseError> {
    let doc = serde_json::to_value(user)?;

    let result = sqlx::query(
        "UPDATE users SET email = $2, password = $3, doc = $4, updated_at = $5 WHERE id = $1",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&doc)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(classify)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("No user with id : {}", user.id)));
    }
    Ok(())
}

/// Delete a user together with every card they own. Cards must not outlive
/// their owner, so both deletes commit or neither does.
pub async fn delete_cascade(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
    let mut tx = pool.begin().await.map_err(DatabaseError::Sqlx)?;

    let cards = sqlx::query("DELETE FROM cards WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::Sqlx)?;

    let users = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::Sqlx)?;

    tx.commit().await.map_err(DatabaseError::Sqlx)?;

    if cards.rows_affected() > 0 {
        tracing::info!(
            "Deleted {} card(s) owned by removed user {}",
            cards.rows_affected(),
            id
        );
    }
    Ok(users.rows_affected())
}
