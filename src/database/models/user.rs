use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile image shown when the user does not upload one
pub const DEFAULT_IMAGE_URL: &str =
    "https://res.cloudinary.com/dlpjcvsii/image/upload/v1688459756/file-upload/tmp-1-1688459755587_hvt1fy.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub city: String,
    pub street: String,
    #[serde(rename = "houseNumber")]
    pub house_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Stored user document. The credential hash lives in its own column and is
/// never part of the serialized document or any API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: PersonName,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub role: Role,
    pub phone: String,
    pub address: UserAddress,
    #[serde(rename = "isBusiness")]
    pub is_business: bool,
    pub image: Image,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Validated registration/update payload, extracted after the schema pass.
/// Unknown fields in the raw body are ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub name: PersonName,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: UserAddress,
    #[serde(rename = "isBusiness", default)]
    pub is_business: bool,
    #[serde(default)]
    pub image: ImagePayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImagePayload {
    /// Apply the placeholder default for a missing or empty url
    pub fn into_image(self) -> Image {
        let url = match self.url {
            Some(url) if !url.is_empty() => url,
            _ => DEFAULT_IMAGE_URL.to_string(),
        };
        Image { url, alt: self.alt }
    }
}

impl UserPayload {
    /// Build a new user record. `password_hash` must already be hashed;
    /// role is decided by the caller, never taken from the payload.
    pub fn into_user(self, id: Uuid, role: Role, password_hash: String) -> User {
        let now = Utc::now();
        User {
            id,
            name: self.name,
            email: self.email,
            password: password_hash,
            role,
            phone: self.phone,
            address: self.address,
            is_business: self.is_business,
            image: self.image.into_image(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields of an existing user. Id, role and
    /// creation time are preserved; the caller decides the credential hash.
    pub fn apply_to(self, existing: &User, password_hash: String) -> User {
        User {
            id: existing.id,
            name: self.name,
            email: self.email,
            password: password_hash,
            role: existing.role,
            phone: self.phone,
            address: self.address,
            is_business: self.is_business,
            image: self.image.into_image(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        }
    }
}
