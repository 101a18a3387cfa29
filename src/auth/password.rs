//! Password hashing with Argon2id and a per-record random salt.
//!
//! Stored credentials are one-way PHC strings; comparison happens through
//! the verifier, never by string equality.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Hash a plaintext password for storage
pub fn hash(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a plaintext password against a stored hash. Any parse or
/// verification failure is reported as a mismatch.
pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_plaintext() {
        let hashed = hash("hunter2hunter2").unwrap();
        assert_ne!(hashed, "hunter2hunter2");
        assert!(hashed.starts_with("$argon2"));
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(verify("correct horse battery staple", &hashed));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(!verify("Correct horse battery staple", &hashed));
        assert!(!verify("", &hashed));
    }

    #[test]
    fn verify_rejects_garbage_hashes() {
        assert!(!verify("anything", "not-a-phc-string"));
        assert!(!verify("anything", ""));
    }

    #[test]
    fn salts_differ_per_record() {
        let a = hash("same password").unwrap();
        let b = hash("same password").unwrap();
        assert_ne!(a, b);
        assert!(verify("same password", &a));
        assert!(verify("same password", &b));
    }
}
