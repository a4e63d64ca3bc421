//! Background Tasks Module
//!
//! Optional maintenance work for the in-process store. The cache engine itself
//! never spawns anything: expiry is decided on access.
//!
//! # Tasks
//! - Sweeper: reclaims expired `MemoryStore` entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_configured_sweeper, spawn_sweep_task};
