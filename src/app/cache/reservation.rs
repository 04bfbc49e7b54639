//! Fetch reservations for coalescing concurrent cache misses
//!
//! Before fetching an uncached key, a caller reserves it. Reservations are
//! per-key async locks: a second caller for the same key waits until the first
//! one has fetched and stored, then re-checks the cache and finds the value.
//! If the holder fails, the next waiter performs its own fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Registry of per-key fetch locks
#[derive(Debug, Default)]
pub struct FetchReservations {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held while a key is being fetched; releases on drop
#[derive(Debug)]
pub struct Reservation {
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl Reservation {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FetchReservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive right to fetch `key`
    pub async fn reserve(&self, key: &str) -> Reservation {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(
                locks
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };

        if lock.try_lock().is_err() {
            debug!("Waiting for in-flight fetch of {}", key);
        }

        Reservation {
            key: key.to_string(),
            _guard: lock.lock_owned().await,
        }
    }

    /// Whether a fetch for `key` is currently in flight
    pub fn is_reserved(&self, key: &str) -> bool {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .get(key)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }

    /// Forget locks nobody holds or waits on
    pub fn prune(&self) -> usize {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let before = locks.len();
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_reservation_is_exclusive_per_key() {
        let reservations = FetchReservations::new();
        let held = reservations.reserve("latest-curiosity").await;
        assert_eq!(held.key(), "latest-curiosity");
        assert!(reservations.is_reserved("latest-curiosity"));
        assert!(!reservations.is_reserved("latest-spirit"));

        drop(held);
        assert!(!reservations.is_reserved("latest-curiosity"));
    }

    #[tokio::test]
    async fn test_waiters_run_one_at_a_time() {
        let reservations = Arc::new(FetchReservations::new());
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reservations = Arc::clone(&reservations);
                let active = Arc::clone(&active);
                let max_active = Arc::clone(&max_active);
                tokio::spawn(async move {
                    let _reservation = reservations.reserve("all-sources").await;
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_active.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            result.unwrap();
        }

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prune_drops_idle_locks() {
        let reservations = FetchReservations::new();
        let held = reservations.reserve("rover-spirit").await;
        drop(reservations.reserve("rover-curiosity").await);

        assert_eq!(reservations.prune(), 1);
        assert!(reservations.is_reserved("rover-spirit"));
        drop(held);
        assert_eq!(reservations.prune(), 1);
    }
}
