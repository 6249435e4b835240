//! Sweeper Task
//!
//! Background task that periodically removes expired map entries.

use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Weak;
use std::thread;
use std::time::Duration;

use tokio::runtime::Builder;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::map::MapInner;

/// Name of the OS thread hosting a sweeper.
const SWEEPER_THREAD_NAME: &str = "timed-map-sweeper";

/// Owner-side handle of a running sweeper.
///
/// Dropping the handle stops the sweeper, binding its lifetime to the map.
#[derive(Debug)]
pub(crate) struct Sweeper {
    shutdown: watch::Sender<bool>,
    thread: thread::JoinHandle<()>,
}

impl Sweeper {
    /// Starts a sweeper for `map` that wakes every `interval`.
    ///
    /// The loop always runs on a dedicated thread driving its own
    /// current-thread runtime, never on the caller's runtime: it must outlive
    /// whatever runtime the map was created in and must not depend on the
    /// caller yielding.
    ///
    /// The sweeper only holds a weak reference and exits on its next wake-up
    /// once the map is gone, even if no stop signal was sent.
    pub(crate) fn spawn<K, V>(map: Weak<MapInner<K, V>>, interval: Duration) -> Result<Self>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let sweep_loop = run_sweeper(map, interval, shutdown_rx);

        let runtime = Builder::new_current_thread().enable_time().build()?;
        let thread = thread::Builder::new()
            .name(SWEEPER_THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(sweep_loop))?;

        Ok(Self { shutdown, thread })
    }

    /// Signals the sweeper to stop. Calling this more than once is harmless.
    pub(crate) fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Returns true while the sweep loop has not exited.
    pub(crate) fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The sweep loop: sleep, evict everything expired, repeat.
///
/// Exits when a stop is signalled, when the owning handle is dropped, or when
/// the map itself no longer exists.
async fn run_sweeper<K, V>(
    map: Weak<MapInner<K, V>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Eq + Hash,
{
    info!("Starting sweeper with interval of {:?}", interval);

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            // Fires on a stop signal and when the sender is dropped
            _ = shutdown.changed() => break,
        }

        let Some(inner) = map.upgrade() else {
            break;
        };

        // A panicking value destructor must not end eviction for good
        match panic::catch_unwind(AssertUnwindSafe(|| inner.sweep_expired())) {
            Ok(removed) if removed > 0 => {
                info!("Sweep: removed {} expired entries", removed);
            }
            Ok(_) => debug!("Sweep: no expired entries found"),
            Err(_) => error!("Sweep pass panicked, continuing with next pass"),
        }
    }

    debug!("Sweeper stopped");
}
