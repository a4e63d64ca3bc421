//! Error types for the cache client
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error: it surfaces as `None` or as the caller's default.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache client.
#[derive(Error, Debug)]
pub enum CacheError {
    /// incr/decr on a missing key, or with a non-numeric operand
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// The backing store failed or could not be reached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Rejected configuration (bad namespace, etc.)
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for CacheError {
    fn from(err: base64::DecodeError) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache client.
pub type Result<T> = std::result::Result<T, CacheError>;
