//! Argon2id password hashing.
//!
//! Hashing is CPU bound, so both operations run on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::core::error::{AppError, Result};

/// Hash a plaintext password into a PHC string
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Check a plaintext password against a stored PHC string
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("admin123".to_string()).await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("admin123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("admin124".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("same".to_string()).await.unwrap();
        let b = hash_password("same".to_string()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_invalid_stored_hash() {
        let result = verify_password("x".to_string(), "not-a-phc-string".to_string()).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
