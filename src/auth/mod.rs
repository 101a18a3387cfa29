use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::database::models::user::{PersonName, Role, User};

pub mod cookie;
pub mod password;

/// Minimal identity claim carried by the session token. Expiry is embedded
/// in the token itself and checked on every verification, independent of
/// the cookie's own expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub name: PersonName,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, expiry_hours: i64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours)).timestamp();

        Self {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Password hashing failed")]
    PasswordHash,
}

/// Sign a session token. The secret comes in through config rather than
/// ambient state so callers control exactly which key is in play.
pub fn issue_token(security: &SecurityConfig, claims: &Claims) -> Result<String, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify a session token's signature and embedded expiry
pub fn verify_token(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::models::user::{Image, UserAddress, DEFAULT_IMAGE_URL};

    pub(crate) fn test_security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-jwt-secret".to_string(),
            cookie_secret: "test-cookie-secret".to_string(),
            token_expiry_hours: 24,
            cors_origin: "http://localhost:3000".to_string(),
            secure_cookies: false,
        }
    }

    pub(crate) fn test_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: PersonName {
                first: "Ada".to_string(),
                middle: None,
                last: "Lovelace".to_string(),
            },
            email: "ada@example.com".to_string(),
            password: "$argon2id$hash".to_string(),
            role,
            phone: "050-123456789".to_string(),
            address: UserAddress {
                state: None,
                country: "UK".to_string(),
                city: "London".to_string(),
                street: "Baker".to_string(),
                house_number: "221b".to_string(),
            },
            is_business: false,
            image: Image {
                url: DEFAULT_IMAGE_URL.to_string(),
                alt: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let security = test_security();
        let user = test_user(Role::Admin);

        let token = issue_token(&security, &Claims::new(&user, 24)).unwrap();
        let claims = verify_token(&security, &token).unwrap();

        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.name, user.name);
    }

    #[test]
    fn expired_token_is_rejected() {
        let security = test_security();
        let user = test_user(Role::User);

        let mut claims = Claims::new(&user, 24);
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        claims.iat = (Utc::now() - Duration::hours(25)).timestamp();

        let token = issue_token(&security, &claims).unwrap();
        assert!(matches!(
            verify_token(&security, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let security = test_security();
        let user = test_user(Role::User);
        let token = issue_token(&security, &Claims::new(&user, 24)).unwrap();

        let mut other = test_security();
        other.jwt_secret = "a-different-secret".to_string();
        assert!(verify_token(&other, &token).is_err());

        let mangled = format!("{}x", token);
        assert!(verify_token(&security, &mangled).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let mut security = test_security();
        security.jwt_secret = String::new();
        let user = test_user(Role::User);

        assert!(matches!(
            issue_token(&security, &Claims::new(&user, 24)),
            Err(AuthError::InvalidSecret)
        ));
        assert!(matches!(
            verify_token(&security, "whatever"),
            Err(AuthError::InvalidSecret)
        ));
    }

    #[test]
    fn expiry_matches_configured_hours() {
        let user = test_user(Role::User);
        let claims = Claims::new(&user, 24);
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 24 * 3600);
    }
}
