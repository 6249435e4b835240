//! Error types for the timed map
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Timed Map Error Enum ==
/// Errors raised while constructing a [`TimedMap`](crate::TimedMap).
///
/// Accessor operations never fail; missing and expired keys are reported as `None`.
#[derive(Error, Debug)]
pub enum TimedMapError {
    /// The operating system refused to start the background sweeper
    #[error("Failed to start sweeper: {0}")]
    SweeperSpawn(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the timed map.
pub type Result<T> = std::result::Result<T, TimedMapError>;
