//! Cryptographic primitives: secret-at-rest encryption for connector API
//! keys, password hashing, and session identifier generation. These are
//! utility-level building blocks for the stored entity contracts in §6;
//! the HTTP/UI surface that would call them is out of scope.

pub mod password;
pub mod secret;
pub mod session;

pub use password::{hash_password, verify_password};
pub use secret::SecretStore;
pub use session::generate_session_id;
