//! Card resource manager: public reads, owner-scoped writes, likes.

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::{self, cards::BIZ_NUMBER_CONSTRAINT, models::card::CardPayload, DatabaseError};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::validation;

fn parse_card_id(id: &str, message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::not_found(message))
}

fn validated_payload(body: Value) -> Result<CardPayload, ApiError> {
    validation::validate(validation::CARD_SCHEMA, &body)
        .map_err(|v| ApiError::Validation(v.first_message()))?;
    serde_json::from_value(body).map_err(|e| ApiError::Validation(e.to_string()))
}

/// GET /cards - public listing, no authentication
pub async fn list() -> Result<Json<Value>, ApiError> {
    let pool = database::pool().await?;
    let cards = database::cards::list(pool).await?;
    Ok(Json(json!({ "cards": cards })))
}

/// GET /cards/my-cards - cards owned by the caller
pub async fn my_cards(Extension(caller): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let pool = database::pool().await?;
    let cards = database::cards::list_by_owner(pool, caller.user_id).await?;
    Ok(Json(json!({ "cards": cards })))
}

/// GET /cards/:id - public fetch
pub async fn get_one(Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let card_id = parse_card_id(&id, "No card found")?;

    let pool = database::pool().await?;
    let card = database::cards::find(pool, card_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No card found"))?;

    Ok(Json(json!({ "card": card })))
}

/// POST /cards - create a card owned by the caller
pub async fn create(
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = validated_payload(body)?;

    let generated = payload.biz_number.is_none();
    let biz_number = payload
        .biz_number
        .unwrap_or_else(database::cards::generate_biz_number);
    let mut card = payload.into_card(Uuid::new_v4(), caller.user_id, biz_number);

    let pool = database::pool().await?;
    match database::cards::create(pool, &mut card, generated).await {
        Ok(()) => {}
        // A caller-supplied bizNumber collided; generated ones retry inside
        // the store and only surface here once exhausted
        Err(DatabaseError::UniqueViolation { ref constraint })
            if constraint == BIZ_NUMBER_CONSTRAINT =>
        {
            return Err(ApiError::bad_request("bizNumber already in use"));
        }
        Err(err) => return Err(err.into()),
    }

    Ok((StatusCode::CREATED, Json(json!({ "card": card }))))
}

/// PUT /cards/:id - update card content. Owner only; admins get no
/// override here, unlike delete.
pub async fn update(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    // Validation runs first, independent of existence and ownership
    let payload = validated_payload(body)?;

    let card_id = parse_card_id(&id, "Card not found")?;

    let pool = database::pool().await?;
    let existing = database::cards::find(pool, card_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Card not found"))?;

    if existing.user_id != caller.user_id {
        return Err(ApiError::authorization("Not Authorized"));
    }

    let updated = payload.apply_to(&existing);
    database::cards::update(pool, &updated).await?;

    Ok(Json(json!({ "card": updated })))
}

/// PATCH /cards/:id - like a card. One like per user, enforced by a single
/// conditional update in the store.
pub async fn like(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let card_id = parse_card_id(&id, "Card not found")?;

    let pool = database::pool().await?;
    match database::cards::like(pool, card_id, caller.user_id).await? {
        Some(card) => Ok(Json(json!({ "msg": "Card liked successfully", "card": card }))),
        // No row matched: the card is either absent or already liked
        None => match database::cards::find(pool, card_id).await? {
            Some(_) => Err(ApiError::bad_request("You already liked this card")),
            None => Err(ApiError::not_found("Card not found")),
        },
    }
}

/// DELETE /cards/:id - remove a card (owner or admin)
pub async fn remove(
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let card_id = parse_card_id(&id, "No cards found")?;

    let pool = database::pool().await?;
    let card = database::cards::find(pool, card_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No cards found"))?;

    if !caller.can_act_on(card.user_id) {
        return Err(ApiError::authorization("Unauthorized to delete this card"));
    }

    database::cards::delete(pool, card_id).await?;

    Ok(Json(json!({ "msg": "Card Deleted Successfully!", "card": card })))
}
