//! Password hashing using argon2
//!
//! Argon2 is intentionally CPU-intensive, so the async variants move the
//! work onto tokio's blocking pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

/// Password hashing service (Argon2id, default parameters)
pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking)
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Hash checked against when no account matches a login email, so an
    /// unknown email costs the same argon2 work as a wrong password.
    pub fn placeholder_hash() -> Option<&'static str> {
        static PLACEHOLDER: OnceLock<Option<String>> = OnceLock::new();
        PLACEHOLDER
            .get_or_init(|| Self::hash("authgate-no-such-account").ok())
            .as_deref()
    }

    /// Spend one verification on the placeholder hash. Never succeeds.
    pub async fn verify_placeholder_async(password: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || {
            if let Some(hash) = Self::placeholder_hash() {
                Self::verify(&password, hash)?;
            }
            Ok(false)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hash = PasswordService::hash(password).unwrap();

        assert!(PasswordService::verify(password, &hash).unwrap());
        assert!(!PasswordService::verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = PasswordService::hash("plain-text-pass").unwrap();
        assert!(!hash.contains("plain-text-pass"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(PasswordService::verify("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_placeholder_hash_is_argon2() {
        let hash = PasswordService::placeholder_hash().unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(PasswordService::placeholder_hash(), Some(hash));
    }

    #[tokio::test]
    async fn test_placeholder_verification_never_succeeds() {
        for candidate in ["", "authgate-no-such-account", "password123"] {
            assert!(!PasswordService::verify_placeholder_async(candidate.to_string())
                .await
                .unwrap());
        }
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let password = "async_test_password".to_string();
        let hash = PasswordService::hash_async(password.clone()).await.unwrap();

        assert!(PasswordService::verify_async(password, hash.clone()).await.unwrap());
        assert!(!PasswordService::verify_async("wrong".to_string(), hash).await.unwrap());
    }
}
