//! Session identifier generation: 64 hex characters, CSPRNG-derived
//! (§6 "Session identifier").

use rand::RngCore;

/// Generates a fresh session identifier: 32 random bytes, hex-encoded.
pub fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_64_hex_characters() {
        let id = generate_session_id();
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn is_not_deterministic() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
