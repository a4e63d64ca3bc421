//! Cache Entry Module
//!
//! The stored form of a cached value: encoded payload plus optional deadline.

use crate::cache::expiry::is_live;

// == Cache Entry ==
/// Represents a single stored entry as the backing store sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The encoded value
    pub value: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(value: Vec<u8>, expires_at: Option<u64>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at the given instant.
    pub fn is_expired_at(&self, now: u64) -> bool {
        !is_live(self.expires_at, now)
    }
}
