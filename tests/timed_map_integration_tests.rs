//! Integration Tests for the Timed Map
//!
//! Exercises the public API end to end, from plain threads and from inside
//! tokio runtimes.

use std::sync::Arc;
use std::thread::{self, sleep};
use std::time::Duration;

use timed_map::{Config, TimedMap};

// == Helper Functions ==

const UNIT: Duration = Duration::from_millis(100);

fn units(n: u32) -> Duration {
    UNIT * n
}

// == Expiration Scenarios ==

#[test]
fn test_mixed_ttls_expire_independently() {
    let map = TimedMap::with_sweep_interval(units(1));
    map.put("a", 1, units(3));
    map.put("b", 2, units(1));

    sleep(units(2));

    assert_eq!(map.get("a"), Some(1));
    assert_eq!(map.get("b"), None);
}

#[test]
fn test_sweeper_evicts_without_reads() {
    let map = TimedMap::with_sweep_interval(Duration::from_millis(200));
    map.put("k", 1, Duration::from_millis(100));
    assert_eq!(map.len(), 1);

    sleep(Duration::from_millis(500));

    // Only the sweeper could have removed it
    assert_eq!(map.len(), 0);
    assert!(!map.contains("k"));
    assert_eq!(map.get("k"), None);
    assert_eq!(map.stats().expired, 0);
}

#[test]
fn test_expired_key_read_then_len_reflects_removal() {
    let map = TimedMap::new();
    map.put("key", "value".to_string(), Duration::from_millis(50));
    assert_eq!(map.get("key"), Some("value".to_string()));

    sleep(Duration::from_millis(100));

    assert_eq!(map.get("key"), None);
    assert_eq!(map.len(), 0);
}

#[test]
fn test_contains_may_report_expired_key() {
    let map = TimedMap::new();
    map.put("key", 1, Duration::from_millis(20));

    sleep(Duration::from_millis(60));

    // contains does not check expiry; only get does
    assert!(map.contains("key"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("key"), None);
}

#[test]
fn test_clear_after_many_inserts() {
    let map = TimedMap::with_config(Config::default());
    for i in 0..100 {
        map.put(i, i * 2, Duration::from_secs(60));
    }
    assert_eq!(map.len(), 100);

    map.clear();

    assert!(map.is_empty());
    for i in 0..100 {
        assert_eq!(map.get(&i), None);
    }
}

#[test]
fn test_maps_are_isolated() {
    let first = TimedMap::new();
    let second: TimedMap<&str, i32> = TimedMap::new();

    first.put("shared-name", 1, Duration::from_secs(60));

    assert_eq!(first.get("shared-name"), Some(1));
    assert_eq!(second.get("shared-name"), None);
    assert!(second.is_empty());
}

#[test]
fn test_try_with_config() {
    let config = Config::new().with_sweep_interval(Duration::from_secs(5));
    let map: TimedMap<String, u8> = TimedMap::try_with_config(config).unwrap();

    assert_eq!(map.sweep_interval(), Duration::from_secs(5));
    assert!(map.is_sweeper_running());
}

#[test]
fn test_zero_sweep_interval_is_usable() {
    let map = TimedMap::with_sweep_interval(Duration::ZERO);
    assert_eq!(map.sweep_interval(), Duration::from_millis(1));

    map.put("key", 1, Duration::ZERO);
    sleep(Duration::from_millis(50));

    assert!(map.is_empty());
}

// == Concurrency ==

#[test]
fn test_concurrent_distinct_keys() {
    let map = Arc::new(TimedMap::new());
    let handles: Vec<_> = (0..10)
        .map(|thread_id| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for i in 0..100 {
                    map.put(format!("thread{}:key{}", thread_id, i), i, Duration::from_secs(60));
                }
                // Remove a tenth of what this thread wrote
                for i in (0..100).step_by(10) {
                    map.remove(&format!("thread{}:key{}", thread_id, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(map.len(), 900);
    assert_eq!(map.get("thread3:key11"), Some(11));
    assert_eq!(map.get("thread3:key10"), None);
}

#[test]
fn test_concurrent_readers_with_active_sweeper() {
    let map = Arc::new(TimedMap::with_sweep_interval(Duration::from_millis(5)));
    for i in 0..200 {
        let ttl = if i % 2 == 0 {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(10)
        };
        map.put(i, i, ttl);
    }

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..20 {
                    for i in (0..200).step_by(2) {
                        assert_eq!(map.get(&i), Some(i));
                    }
                    thread::sleep(Duration::from_millis(2));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    sleep(Duration::from_millis(50));
    assert_eq!(map.len(), 100);
}

// == Tokio Runtime ==

#[tokio::test]
async fn test_sweeper_on_current_thread_runtime() {
    let map = TimedMap::with_sweep_interval(Duration::from_millis(200));
    map.put("k", 1, Duration::from_millis(100));

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(map.len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_map_shared_between_tasks() {
    let map = Arc::new(TimedMap::with_sweep_interval(Duration::from_millis(50)));

    let writers: Vec<_> = (0..8)
        .map(|task_id| {
            let map = Arc::clone(&map);
            tokio::spawn(async move {
                for i in 0..50 {
                    map.put(format!("task{}:{}", task_id, i), i, Duration::from_secs(60));
                }
            })
        })
        .collect();

    for writer in writers {
        writer.await.unwrap();
    }

    assert_eq!(map.len(), 400);
    assert_eq!(map.get("task7:49"), Some(49));
}

#[test]
fn test_sweeper_outlives_creating_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let map = runtime.block_on(async { TimedMap::with_sweep_interval(Duration::from_millis(20)) });
    drop(runtime);

    map.put("k", 1, Duration::ZERO);
    sleep(Duration::from_millis(200));

    assert!(map.is_sweeper_running());
    assert_eq!(map.len(), 0, "Sweeper should keep evicting after the runtime is gone");
}

#[tokio::test]
async fn test_sweeper_runs_while_runtime_is_blocked() {
    let map = TimedMap::with_sweep_interval(Duration::from_millis(20));
    map.put("k", 1, Duration::ZERO);

    // Blocks the only runtime thread without yielding
    sleep(Duration::from_millis(200));

    assert_eq!(map.len(), 0);
}

#[tokio::test]
async fn test_drop_stops_sweeper() {
    let map: TimedMap<u8, u8> = TimedMap::with_sweep_interval(Duration::from_millis(10));
    assert!(map.is_sweeper_running());

    map.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!map.is_sweeper_running());

    // Dropping a map whose sweeper already stopped is fine
    drop(map);
}
