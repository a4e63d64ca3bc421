//! Cache Module
//!
//! The cache semantics engine and its parts: key codec, expiration policy,
//! arithmetic coercion and batch orchestration.

mod arith;
mod batch;
mod client;
mod default_value;
pub mod expiry;
mod keys;


// Re-export public types
pub use arith::Number;
pub use client::Cache;
pub use default_value::DefaultValue;
pub use keys::{KeyCodec, Version};
