//! Timed Map - A concurrent in-memory map with per-entry expiry
//!
//! Every entry carries its own time-to-live. Expired entries are evicted lazily
//! when read and proactively by a background sweeper bound to the map's lifetime.

pub mod config;
pub mod error;
pub mod map;
mod tasks;

pub use config::Config;
pub use error::{Result, TimedMapError};
pub use map::{MapStats, TimedMap};
