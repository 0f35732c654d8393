//! # shelfwatch-core
//!
//! Shared primitives used by every other crate in this workspace:
//!
//! - Error taxonomy, retry policy, circuit breaker, and recovery helpers
//! - Configuration loading and validation from the environment
//! - Secret-at-rest encryption, password hashing, session id generation
//! - Time/window helpers for the throttle enforcer and schedulers
//! - Shared domain enums for the entities every other crate persists
//!
//! ## Examples
//!
//! ```rust
//! use shelfwatch_core::error::{EngineError, Result};
//!
//! fn classify(err: &EngineError) -> &'static str {
//!     err.category()
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod time;

#[cfg(test)]
pub mod testing;

pub use config::Config;
pub use error::{EngineError, ErrorCategory, ErrorSeverity, Result};

/// Current version of shelfwatch-core.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for crates that build on top of this one.
pub mod prelude {
    pub use crate::error::{EngineError, ErrorCategory, ErrorExt, ErrorSeverity, Result};
    pub use crate::models::*;
    pub use async_trait::async_trait;
    pub use serde_json::{json, Value};
    pub use uuid::Uuid;
}
