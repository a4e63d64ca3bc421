//! Mini Cache - A versioned cache client
//!
//! Get/set/add/incr/touch and batch operations with TTLs and version
//! namespacing, over any store implementing the [`Store`] primitives.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;
pub mod tasks;
pub mod value;

pub use cache::{Cache, DefaultValue, Number, Version};
pub use codec::{Codec, JsonCodec};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use store::{MemoryStore, Store};
pub use tasks::{spawn_configured_sweeper, spawn_sweep_task};
pub use value::Value;
