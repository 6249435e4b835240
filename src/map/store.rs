//! Timed Map Store Module
//!
//! Main map engine combining HashMap storage with TTL expiration, lazy
//! eviction on read and a background sweeper.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use super::entry::Entry;
use super::stats::{MapStats, StatsRecorder};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::Sweeper;

// == Map Inner ==
/// State shared between a map handle and its sweeper.
#[derive(Debug)]
pub(crate) struct MapInner<K, V> {
    /// Key-value storage, the only shared mutable resource
    entries: RwLock<HashMap<K, Entry<V>>>,
    /// Read and eviction counters
    stats: StatsRecorder,
}

impl<K, V> Default for MapInner<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: StatsRecorder::default(),
        }
    }
}

impl<K: Eq + Hash, V> MapInner<K, V> {
    // A panic while the lock is held (e.g. in a value's Drop) poisons it.
    // The map is still structurally sound afterwards, so keep serving.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert(&self, key: K, value: V, ttl: Duration, now: Instant) {
        let entry = Entry::new(value, ttl, now);
        self.write().insert(key, entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }

    // == Sweep Expired ==
    /// Removes every entry expired at the instant the pass starts.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn sweep_expired(&self) -> usize {
        let mut entries = self.write();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        drop(entries);

        self.stats.record_sweep(removed);
        removed
    }
}

// == Timed Map ==
/// A concurrent map whose entries expire individually.
///
/// Expired entries are removed in two ways: [`get`](Self::get) evicts the key
/// it reads, and a background sweeper removes everything expired once per
/// sweep interval. The sweeper stops when the map is dropped or
/// [`stop`](Self::stop) is called.
///
/// [`contains`](Self::contains) and [`len`](Self::len) look at physical
/// storage only: an expired key that has not been swept or read yet is still
/// reported as present and counted.
///
/// Share a map between threads by wrapping it in an [`Arc`].
///
/// ```rust
/// use std::time::Duration;
/// use timed_map::TimedMap;
///
/// let sessions = TimedMap::with_sweep_interval(Duration::from_secs(30));
/// sessions.put("token", 42, Duration::from_secs(300));
/// assert_eq!(sessions.get("token"), Some(42));
/// ```
pub struct TimedMap<K, V> {
    inner: Arc<MapInner<K, V>>,
    sweeper: Sweeper,
    sweep_interval: Duration,
}

impl<K, V> TimedMap<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates a map swept once a minute.
    ///
    /// # Panics
    /// Panics if the sweeper cannot be started, see [`try_with_config`](Self::try_with_config).
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a map swept every `interval`.
    ///
    /// # Panics
    /// Panics if the sweeper cannot be started, see [`try_with_config`](Self::try_with_config).
    pub fn with_sweep_interval(interval: Duration) -> Self {
        Self::with_config(Config::default().with_sweep_interval(interval))
    }

    /// Creates a map from `config`.
    ///
    /// # Panics
    /// Panics if the sweeper cannot be started, see [`try_with_config`](Self::try_with_config).
    pub fn with_config(config: Config) -> Self {
        Self::try_with_config(config).unwrap_or_else(|err| panic!("{}", err))
    }

    /// Creates a map from `config` and starts its sweeper.
    ///
    /// The sweeper runs on its own thread, so it keeps running independently
    /// of any tokio runtime the map is created or used in.
    ///
    /// # Errors
    /// Returns [`TimedMapError::SweeperSpawn`](crate::TimedMapError::SweeperSpawn)
    /// if the sweeper thread or its runtime cannot be created.
    pub fn try_with_config(config: Config) -> Result<Self> {
        let sweep_interval = config.effective_sweep_interval();
        let inner = Arc::new(MapInner::default());
        let sweeper = Sweeper::spawn(Arc::downgrade(&inner), sweep_interval)?;

        Ok(Self {
            inner,
            sweeper,
            sweep_interval,
        })
    }
}

impl<K, V> Default for TimedMap<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> TimedMap<K, V> {
    // == Put ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// Any previous entry is replaced in full, value and expiration, whether
    /// or not it had expired. A zero `ttl` stores an already expired entry.
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        self.inner.insert(key, value, ttl, Instant::now());
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// Returns None if the key is absent or expired. An expired entry is
    /// removed as a side effect.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        {
            let entries = self.inner.read();
            match entries.get(key) {
                None => {
                    self.inner.stats.record_miss();
                    return None;
                }
                Some(entry) if !entry.is_expired(Instant::now()) => {
                    self.inner.stats.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        // Another caller may have refreshed or removed the key between
        // releasing the read lock and taking the write lock.
        let mut entries = self.inner.write();
        if entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(Instant::now()))
        {
            entries.remove(key);
            self.inner.stats.record_expired();
        }
        self.inner.stats.record_miss();
        None
    }

    // == Time To Live ==
    /// Returns how long the entry under `key` stays live.
    ///
    /// Returns None if the key is absent or expired, and [`Duration::MAX`]
    /// for an entry whose deadline is beyond the clock's range.
    pub fn ttl<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let entries = self.inner.read();
        let entry = entries.get(key).filter(|entry| !entry.is_expired(now))?;
        Some(entry.ttl_remaining(now).unwrap_or(Duration::MAX))
    }

    // == Contains ==
    /// Returns true if `key` is physically stored.
    ///
    /// Expiry is not checked and nothing is evicted, so this can return true
    /// for a key that [`get`](Self::get) reports as missing.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains_key(key)
    }

    // == Remove ==
    /// Removes `key` regardless of its expiration. Does nothing if absent.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().remove(key);
    }

    // == Clear ==
    /// Removes all entries in one step.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been evicted yet.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Sweep ==
    /// Runs one eviction pass now, in the calling thread.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        self.inner.sweep_expired()
    }

    // == Stats ==
    /// Returns a snapshot of the map's counters.
    pub fn stats(&self) -> MapStats {
        self.inner.stats.snapshot(self.len())
    }

    /// Returns the interval between background sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    // == Sweeper Lifecycle ==
    /// Stops the background sweeper.
    ///
    /// The map stays usable: reads still evict lazily and
    /// [`sweep`](Self::sweep) still works. Dropping the map stops the sweeper
    /// as well.
    pub fn stop(&self) {
        self.sweeper.stop();
    }

    /// Returns true while the background sweeper is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.is_running()
    }
}

impl<K, V> fmt::Debug for TimedMap<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedMap")
            .field("len", &self.inner.len())
            .field("sweep_interval", &self.sweep_interval)
            .finish()
    }
}
