//! Password hashing for stored users.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

/// Hash a clear-text password into an argon2 PHC string.
pub fn hash(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Hash(e.to_string()))
}

/// Check a clear-text password against a stored hash.
pub fn verify(plain: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() -> Result<(), ServiceError> {
        let h = hash("pwd")?;
        assert!(h.starts_with("$argon2"));
        assert!(verify("pwd", &h));
        assert!(!verify("other", &h));
        assert!(!verify("pwd", "not-a-hash"));
        Ok(())
    }
}
