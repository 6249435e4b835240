//! Configuration Module
//!
//! Construction-time settings for a [`TimedMap`](crate::TimedMap).

use std::time::Duration;

use tracing::warn;

/// Interval used when no other is configured.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Smallest accepted sweep interval; shorter values are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Map configuration parameters.
///
/// ```rust
/// use std::time::Duration;
/// use timed_map::Config;
///
/// let config = Config::default().with_sweep_interval(Duration::from_secs(5));
/// assert_eq!(config.sweep_interval, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time the sweeper sleeps between eviction passes
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Returns the interval the sweeper will actually use.
    ///
    /// A zero interval would make the sweeper spin, so it is raised to
    /// [`MIN_SWEEP_INTERVAL`].
    pub(crate) fn effective_sweep_interval(&self) -> Duration {
        if self.sweep_interval < MIN_SWEEP_INTERVAL {
            warn!(
                "Sweep interval {:?} is below minimum, using {:?}",
                self.sweep_interval, MIN_SWEEP_INTERVAL
            );
            MIN_SWEEP_INTERVAL
        } else {
            self.sweep_interval
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(Config::new(), config);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new().with_sweep_interval(Duration::from_millis(250));
        assert_eq!(config.sweep_interval, Duration::from_millis(250));
        assert_eq!(config.effective_sweep_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = Config::new().with_sweep_interval(Duration::ZERO);
        assert_eq!(config.effective_sweep_interval(), MIN_SWEEP_INTERVAL);
    }
}
