//! Card document store.

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use super::models::card::Card;
use super::{classify, DatabaseError};

/// Unique constraint backing the bizNumber column
pub const BIZ_NUMBER_CONSTRAINT: &str = "cards_biz_number_key";

const BIZ_NUMBER_ATTEMPTS: u32 = 5;

/// Random 7-digit business number
pub fn generate_biz_number() -> i64 {
    rand::rng().random_range(1_000_000..=9_999_999)
}

fn row_to_card(row: &PgRow) -> Result<Card, DatabaseError> {
    let doc: Value = row.try_get("doc").map_err(DatabaseError::Sqlx)?;
    Ok(serde_json::from_value(doc)?)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Card>, DatabaseError> {
    let rows = sqlx::query("SELECT doc FROM cards ORDER BY created_at")
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    rows.iter().map(row_to_card).collect()
}

pub async fn list_by_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Card>, DatabaseError> {
    let rows = sqlx::query("SELECT doc FROM cards WHERE user_id = $1 ORDER BY created_at")
        .bind(owner)
        .fetch_all(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    rows.iter().map(row_to_card).collect()
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Card>, DatabaseError> {
    let row = sqlx::query("SELECT doc FROM cards WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    row.as_ref().map(row_to_card).transpose()
}

async fn insert(pool: &PgPool, card: &Card) -> Result<(), DatabaseError> {
    let doc = serde_json::to_value(card)?;

    sqlx::query(
        "INSERT INTO cards (id, biz_number, user_id, doc, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(card.id)
    .bind(card.biz_number)
    .bind(card.user_id)
    .bind(&doc)
    .bind(card.created_at)
    .bind(card.updated_at)
    .execute(pool)
    .await
    .map_err(classify)?;

    Ok(())
}

/// Insert a new card. When the bizNumber was generated rather than supplied
/// by the caller, a collision with an existing card triggers regeneration
/// and a bounded number of retries; a caller-supplied number is never
/// silently replaced, so its collision propagates.
pub async fn create(pool: &PgPool, card: &mut Card, generated: bool) -> Result<(), DatabaseError> {
    let mut attempts = 0;
    loop {
        match insert(pool, card).await {
            Err(DatabaseError::UniqueViolation { ref constraint })
                if constraint == BIZ_NUMBER_CONSTRAINT
                    && generated
                    && attempts < BIZ_NUMBER_ATTEMPTS =>
            {
                attempts += 1;
                card.biz_number = generate_biz_number();
                tracing::debug!(
                    "bizNumber collision, retrying with {} (attempt {})",
                    card.biz_number,
                    attempts
                );
            }
            other => return other,
        }
    }
}

/// Replace a card's document. The biz_number and user_id columns stay
/// untouched; those fields are immutable in the document as well.
pub async fn update(pool: &PgPool, card: &Card) -> Result<(), DatabaseError> {
    let doc = serde_json::to_value(card)?;

    let result = sqlx::query("UPDATE cards SET doc = $2, updated_at = $3 WHERE id = $1")
        .bind(card.id)
        .bind(&doc)
        .bind(card.updated_at)
        .execute(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Card not found".to_string()));
    }
    Ok(())
}

/// Append `user_id` to the card's likes as one conditional update. The
/// membership check and the append happen inside a single statement, so two
/// concurrent likes cannot both pass the check; the loser matches no row.
/// Returns the updated card, or None when no row matched (card absent or
/// already liked - the caller disambiguates).
pub async fn like(pool: &PgPool, card_id: Uuid, user_id: Uuid) -> Result<Option<Card>, DatabaseError> {
    let entry = serde_json::json!([user_id]);
    let stamp = serde_json::to_value(Utc::now())?;

    let row = sqlx::query(
        r#"
        UPDATE cards
        SET doc = jsonb_set(
                jsonb_set(doc, '{likes}', (doc->'likes') || $2),
                '{updatedAt}', $3
            ),
            updated_at = now()
        WHERE id = $1 AND NOT (doc->'likes') @> $2
        RETURNING doc
        "#,
    )
    .bind(card_id)
    .bind(&entry)
    .bind(&stamp)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::Sqlx)?;

    row.as_ref().map(row_to_card).transpose()
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM cards WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(DatabaseError::Sqlx)?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biz_numbers_are_seven_digits() {
        for _ in 0..1000 {
            let n = generate_biz_number();
            assert!((1_000_000..=9_999_999).contains(&n), "out of range: {}", n);
        }
    }
}
