//! Secret-at-rest encryption for connector API keys.
//!
//! A single process-wide 256-bit key, loaded once from configuration and
//! validated as 64 hex characters, is used for every row; no per-row key
//! derivation is performed (§5 "Secret access"). The stored format is
//! `iv:authTag:ciphertext`, each component hex-encoded; IV is 16 bytes,
//! auth tag 16 bytes, AES-GCM.

use crate::error::EngineError;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

const IV_LEN: usize = 16;

/// Holds the process-wide secret key and encrypts/decrypts values against
/// it.
pub struct SecretStore {
    cipher: Aes256Gcm,
}

impl SecretStore {
    /// `hex_key` must be 64 hex characters (32 bytes).
    pub fn new(hex_key: &str) -> Result<Self, EngineError> {
        let key_bytes = hex::decode(hex_key)
            .map_err(|e| EngineError::Configuration { message: format!("SECRET_KEY is not valid hex: {}", e) })?;

        if key_bytes.len() != 32 {
            return Err(EngineError::Configuration {
                message: format!("SECRET_KEY must decode to 32 bytes, got {}", key_bytes.len()),
            });
        }

        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Self { cipher: Aes256Gcm::new(key) })
    }

    /// Encrypts `plaintext`, returning `iv:authTag:ciphertext` hex-encoded.
    /// AES-GCM appends the 16-byte auth tag to the ciphertext; this splits
    /// it back out for the stored format.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, EngineError> {
        let mut iv_bytes = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv_bytes);
        let nonce = Nonce::from_slice(&iv_bytes);

        let sealed = self
            .cipher
            .encrypt(nonce, Payload { msg: plaintext.as_bytes(), aad: &[] })
            .map_err(|e| EngineError::Decryption { message: format!("encryption failed: {}", e) })?;

        let (ciphertext, auth_tag) = sealed.split_at(sealed.len() - 16);

        Ok(format!("{}:{}:{}", hex::encode(iv_bytes), hex::encode(auth_tag), hex::encode(ciphertext)))
    }

    /// Decrypts a value previously produced by [`SecretStore::encrypt`].
    pub fn decrypt(&self, stored: &str) -> Result<String, EngineError> {
        let mut parts = stored.splitn(3, ':');
        let (iv_hex, tag_hex, ciphertext_hex) = match (parts.next(), parts.next(), parts.next()) {
            (Some(iv), Some(tag), Some(ct)) => (iv, tag, ct),
            _ => {
                return Err(EngineError::Decryption {
                    message: "stored secret is not in iv:authTag:ciphertext format".to_string(),
                })
            }
        };

        let iv = hex::decode(iv_hex).map_err(|e| EngineError::Decryption { message: format!("invalid iv hex: {}", e) })?;
        let tag =
            hex::decode(tag_hex).map_err(|e| EngineError::Decryption { message: format!("invalid auth tag hex: {}", e) })?;
        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| EngineError::Decryption { message: format!("invalid ciphertext hex: {}", e) })?;

        if iv.len() != IV_LEN {
            return Err(EngineError::Decryption { message: format!("iv must be {} bytes, got {}", IV_LEN, iv.len()) });
        }
        if tag.len() != 16 {
            return Err(EngineError::Decryption { message: format!("auth tag must be 16 bytes, got {}", tag.len()) });
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);

        let nonce = Nonce::from_slice(&iv);
        let plaintext = self
            .cipher
            .decrypt(nonce, Payload { msg: &sealed, aad: &[] })
            .map_err(|e| EngineError::Decryption { message: format!("decryption failed: {}", e) })?;

        String::from_utf8(plaintext)
            .map_err(|e| EngineError::Decryption { message: format!("decrypted value is not valid utf-8: {}", e) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SecretStore {
        SecretStore::new(&"a1".repeat(32)).unwrap()
    }

    #[test]
    fn round_trips_a_secret() {
        let store = test_store();
        let encrypted = store.encrypt("super-secret-api-key").unwrap();
        let parts: Vec<&str> = encrypted.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), IV_LEN * 2);
        assert_eq!(parts[1].len(), 16 * 2);

        let decrypted = store.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, "super-secret-api-key");
    }

    #[test]
    fn rejects_malformed_stored_value() {
        let store = test_store();
        assert!(store.decrypt("not-the-right-format").is_err());
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let store = test_store();
        let mut encrypted = store.encrypt("super-secret-api-key").unwrap();
        encrypted.push('0');
        assert!(store.decrypt(&encrypted).is_err());
    }

    #[test]
    fn rejects_key_of_wrong_length() {
        assert!(SecretStore::new("too-short").is_err());
    }
}
