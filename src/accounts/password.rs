// Password hashing and verification service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::accounts::error::AuthError;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a plaintext password with Argon2id and a fresh random salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Verify a password against a stored PHC hash (constant-time)
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hash = PasswordService::hash_password("Str0ngPass!").unwrap();
        assert!(PasswordService::verify_password("Str0ngPass!", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_fails_verification() {
        let hash = PasswordService::hash_password("Str0ngPass!").unwrap();
        assert!(!PasswordService::verify_password("WrongPass!", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = PasswordService::hash_password("Str0ngPass!").unwrap();
        let second = PasswordService::hash_password("Str0ngPass!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_is_a_phc_string() {
        let hash = PasswordService::hash_password("Str0ngPass!").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_garbage_hash_is_an_error_not_a_mismatch() {
        assert!(PasswordService::verify_password("x", "not-a-phc-string").is_err());
    }
}
