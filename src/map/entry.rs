//! Map Entry Module
//!
//! Defines the structure for individual map entries with TTL support.

use std::time::{Duration, Instant};

// == Entry ==
/// A stored value together with its absolute expiration instant.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = the deadline lies beyond the clock's range
    pub expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` after `now`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: compute_expiration(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches its
    /// expiration instant, so a zero TTL produces an entry that is already
    /// expired.
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry is still live
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(now))
    }
}

// == Utility Functions ==
/// Returns `now + ttl`, or None when that instant cannot be represented.
pub fn compute_expiration(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}
