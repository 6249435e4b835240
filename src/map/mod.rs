//! Map Module
//!
//! Provides the expiring map with lazy and sweeper-driven eviction.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use stats::MapStats;
pub use store::TimedMap;

pub(crate) use store::MapInner;
