use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub city: String,
    pub street: String,
    #[serde(rename = "houseNumber")]
    pub house_number: i64,
    pub zip: i64,
}

/// Stored card document. `likes` is insertion-ordered but carries set
/// semantics: a user id appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub web: String,
    pub image: CardImage,
    pub address: CardAddress,
    #[serde(rename = "bizNumber")]
    pub biz_number: i64,
    pub likes: Vec<Uuid>,
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated create/update payload, extracted after the schema pass
#[derive(Debug, Clone, Deserialize)]
pub struct CardPayload {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub web: String,
    pub image: CardImage,
    pub address: CardAddress,
    #[serde(rename = "bizNumber", default)]
    pub biz_number: Option<i64>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
}

impl CardPayload {
    /// Build a new card owned by `owner`. A missing bizNumber is filled in
    /// by the store, which owns collision handling.
    pub fn into_card(self, id: Uuid, owner: Uuid, biz_number: i64) -> Card {
        let now = Utc::now();
        Card {
            id,
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            phone: self.phone,
            email: self.email,
            web: self.web,
            image: self.image,
            address: self.address,
            biz_number,
            likes: self.likes,
            user_id: owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content fields of an existing card. Identity, owner,
    /// likes, bizNumber and creation time are immutable here.
    pub fn apply_to(self, existing: &Card) -> Card {
        Card {
            id: existing.id,
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            phone: self.phone,
            email: self.email,
            web: self.web,
            image: self.image,
            address: self.address,
            biz_number: existing.biz_number,
            likes: existing.likes.clone(),
            user_id: existing.user_id,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> CardPayload {
        serde_json::from_value(json!({
            "title": "Corner Bakery",
            "subtitle": "Fresh bread daily",
            "description": "Sourdough, rye and pastries baked every morning.",
            "phone": "03-1234567",
            "email": "hello@bakery.example",
            "web": "https://bakery.example",
            "image": { "url": "https://bakery.example/front.jpg", "alt": "storefront" },
            "address": {
                "country": "IL",
                "city": "Tel Aviv",
                "street": "Herzl",
                "houseNumber": 12,
                "zip": 61000
            }
        }))
        .expect("payload should deserialize")
    }

    #[test]
    fn wire_names_are_preserved() {
        let owner = Uuid::new_v4();
        let card = sample_payload().into_card(Uuid::new_v4(), owner, 1234567);
        let doc = serde_json::to_value(&card).unwrap();
        assert_eq!(doc["bizNumber"], json!(1234567));
        assert_eq!(doc["address"]["houseNumber"], json!(12));
        assert_eq!(doc["user_id"], json!(owner.to_string()));
        assert!(doc.get("createdAt").is_some());
    }

    #[test]
    fn likes_default_to_empty() {
        let card = sample_payload().into_card(Uuid::new_v4(), Uuid::new_v4(), 1000000);
        assert!(card.likes.is_empty());
    }

    #[test]
    fn update_preserves_owner_likes_and_biz_number() {
        let owner = Uuid::new_v4();
        let fan = Uuid::new_v4();
        let mut existing = sample_payload().into_card(Uuid::new_v4(), owner, 7654321);
        existing.likes.push(fan);

        let mut payload = sample_payload();
        payload.title = "Corner Bakery & Cafe".to_string();
        payload.biz_number = Some(1111111);

        let updated = payload.apply_to(&existing);
        assert_eq!(updated.title, "Corner Bakery & Cafe");
        assert_eq!(updated.user_id, owner);
        assert_eq!(updated.likes, vec![fan]);
        assert_eq!(updated.biz_number, 7654321);
        assert_eq!(updated.created_at, existing.created_at);
    }

    #[test]
    fn document_round_trips() {
        let card = sample_payload().into_card(Uuid::new_v4(), Uuid::new_v4(), 2222222);
        let doc = serde_json::to_value(&card).unwrap();
        let back: Card = serde_json::from_value(doc).unwrap();
        assert_eq!(back.id, card.id);
        assert_eq!(back.address, card.address);
        assert_eq!(back.biz_number, card.biz_number);
    }
}
