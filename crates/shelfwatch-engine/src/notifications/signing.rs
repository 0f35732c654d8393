//! HMAC-SHA256 webhook payload signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs `payload` with `secret`, returning a lowercase hex digest suitable
/// for an `X-Signature` header.
pub fn sign_payload(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_deterministic_for_the_same_input() {
        let a = sign_payload(b"secret", b"payload");
        let b = sign_payload(b"secret", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn different_secrets_produce_different_signatures() {
        let a = sign_payload(b"secret-one", b"payload");
        let b = sign_payload(b"secret-two", b"payload");
        assert_ne!(a, b);
    }
}
