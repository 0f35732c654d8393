//! Argon2id password hashing: memoryCost 65536 KiB, timeCost 3,
//! parallelism 1 (§6 "Password hash").

use crate::error::EngineError;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

fn argon2() -> Result<Argon2<'static>, EngineError> {
    let params = Params::new(65536, 3, 1, None)
        .map_err(|e| EngineError::Configuration { message: format!("invalid argon2 params: {}", e) })?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `password`, returning a PHC-format string suitable for storage.
pub fn hash_password(password: &str) -> Result<String, EngineError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let hasher = argon2()?;
    let hash = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| EngineError::Unknown { message: format!("password hashing failed: {}", e) })?;
    Ok(hash.to_string())
}

/// Verifies `password` against a PHC-format hash produced by
/// [`hash_password`].
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, EngineError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| EngineError::Validation { message: format!("malformed password hash: {}", e) })?;
    let hasher = argon2()?;
    Ok(hasher.verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn each_hash_uses_a_fresh_salt() {
        let hash1 = hash_password("same-password").unwrap();
        let hash2 = hash_password("same-password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn rejects_malformed_stored_hash() {
        assert!(verify_password("anything", "not-a-phc-hash").is_err());
    }
}
