use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config;

pub mod cards;
pub mod models;
pub mod users;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Process-wide connection pool, connected lazily on first use
pub async fn pool() -> Result<&'static PgPool, DatabaseError> {
    POOL.get_or_try_init(|| async {
        let config = config::config();
        let url = config
            .database
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(url)
            .await
            .map_err(DatabaseError::Sqlx)?;

        Ok(pool)
    })
    .await
}

/// Connect and create the document tables if they do not exist yet.
/// Each entity row is the full document plus extracted columns for the
/// unique and lookup constraints.
pub async fn init() -> Result<(), DatabaseError> {
    let pool = pool().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            doc JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(DatabaseError::Sqlx)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cards (
            id UUID PRIMARY KEY,
            biz_number BIGINT NOT NULL UNIQUE,
            user_id UUID NOT NULL,
            doc JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(DatabaseError::Sqlx)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS cards_user_id_idx ON cards (user_id)")
        .execute(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    tracing::info!("Document store ready");
    Ok(())
}

/// Classify driver errors, surfacing unique-constraint violations by name
pub(crate) fn classify(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some("23505") {
            return DatabaseError::UniqueViolation {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            };
        }
    }
    DatabaseError::Sqlx(err)
}
