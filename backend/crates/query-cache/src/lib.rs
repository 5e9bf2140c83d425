//! Staleness-aware, key-addressed cache of asynchronous query results.
//!
//! Route loaders use this cache to guarantee that everything a view reads
//! is resident before rendering starts: [`QueryCache::ensure`] returns a
//! fresh value or runs the supplied fetch exactly once, coalescing
//! concurrent fetches for the same key, and [`QueryCache::peek`] gives the
//! render step a synchronous read of the resident value. Mutations drop
//! whole resource classes with [`QueryCache::invalidate_prefix`].
//!
//! Invariants:
//! - A fresh entry never triggers a second fetch.
//! - A failed fetch leaves no entry behind.
//! - No lock is held across a fetch await.

mod key;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::sync::watch;

pub use key::{QueryKey, Segment};

/// Shared clock handle used for staleness decisions.
pub type CacheClock = Arc<dyn Clock + Send + Sync>;

#[derive(Debug, Clone)]
struct CachedEntry {
    value: Arc<Value>,
    fetched_at: DateTime<Utc>,
}

enum EntryState {
    Ready(CachedEntry),
    Pending(watch::Receiver<()>),
}

enum Step {
    Return(Arc<Value>),
    Wait(watch::Receiver<()>),
    Fetch(watch::Sender<()>),
}

/// Key-addressed cache of last-fetched query results.
///
/// # Examples
/// ```
/// use chrono::Duration;
/// use query_cache::{QueryCache, QueryKey};
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let cache = QueryCache::new();
/// let key = QueryKey::root("posts").with("list");
/// let value = cache
///     .ensure(&key, Duration::seconds(30), || async {
///         Ok::<_, std::convert::Infallible>(json!(["first post"]))
///     })
///     .await
///     .unwrap();
/// assert_eq!(*value, json!(["first post"]));
/// assert!(cache.peek(&key).is_some());
/// # });
/// ```
pub struct QueryCache {
    clock: CacheClock,
    entries: Mutex<HashMap<QueryKey, EntryState>>,
}

impl QueryCache {
    /// Create a cache reading staleness from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Create a cache with an injected clock.
    #[must_use]
    pub fn with_clock(clock: CacheClock) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<QueryKey, EntryState>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CachedEntry, stale_after: Duration) -> bool {
        self.clock.utc().signed_duration_since(entry.fetched_at) <= stale_after
    }

    /// Return the resident value for `key`, fetching if absent or stale.
    ///
    /// Concurrent calls for the same key are coalesced: one caller runs
    /// `fetch`, the others wait for its outcome and then re-read the
    /// entry. When the in-flight fetch fails, waiters run their own fetch
    /// rather than inheriting the failure.
    ///
    /// # Errors
    /// Propagates the fetch error. The cache holds no entry for `key`
    /// afterwards.
    pub async fn ensure<F, Fut, E>(
        &self,
        key: &QueryKey,
        stale_after: Duration,
        fetch: F,
    ) -> Result<Arc<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        loop {
            let step = {
                let mut entries = self.lock_entries();
                match entries.get(key) {
                    Some(EntryState::Ready(entry)) if self.is_fresh(entry, stale_after) => {
                        Step::Return(Arc::clone(&entry.value))
                    }
                    // A live sender means another caller is mid-fetch; a
                    // dead one means that caller was cancelled and the
                    // slot must be reclaimed.
                    Some(EntryState::Pending(rx)) if rx.has_changed().is_ok() => {
                        Step::Wait(rx.clone())
                    }
                    _ => {
                        let (tx, rx) = watch::channel(());
                        entries.insert(key.clone(), EntryState::Pending(rx));
                        Step::Fetch(tx)
                    }
                }
            };

            match step {
                Step::Return(value) => return Ok(value),
                Step::Wait(mut rx) => {
                    // Resolves when the fetcher drops its sender, whether
                    // the fetch succeeded or not; the loop re-reads the
                    // entry to find out which.
                    let _settled = rx.changed().await;
                }
                Step::Fetch(tx) => {
                    let outcome = fetch().await;
                    let mut entries = self.lock_entries();
                    return match outcome {
                        Ok(fetched) => {
                            let shared = Arc::new(fetched);
                            entries.insert(
                                key.clone(),
                                EntryState::Ready(CachedEntry {
                                    value: Arc::clone(&shared),
                                    fetched_at: self.clock.utc(),
                                }),
                            );
                            drop(entries);
                            drop(tx);
                            Ok(shared)
                        }
                        Err(error) => {
                            entries.remove(key);
                            drop(entries);
                            drop(tx);
                            Err(error)
                        }
                    };
                }
            }
        }
    }

    /// Synchronously read the resident value for `key`, if any.
    ///
    /// Residency, not freshness: the loader has already ensured the entry
    /// is fresh enough for the current transition.
    #[must_use]
    pub fn peek(&self, key: &QueryKey) -> Option<Arc<Value>> {
        match self.lock_entries().get(key) {
            Some(EntryState::Ready(entry)) => Some(Arc::clone(&entry.value)),
            _ => None,
        }
    }

    /// Drop the resident entry for exactly `key`.
    ///
    /// In-flight fetches are left to settle; they re-insert their result.
    pub fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.lock_entries();
        if matches!(entries.get(key), Some(EntryState::Ready(_))) {
            entries.remove(key);
        }
    }

    /// Drop every resident entry whose key lies under `prefix`.
    pub fn invalidate_prefix(&self, prefix: &QueryKey) {
        self.lock_entries()
            .retain(|key, state| match state {
                EntryState::Ready(_) => !key.starts_with(prefix),
                EntryState::Pending(_) => true,
            });
    }

    /// Drop every resident entry.
    pub fn purge(&self) {
        self.lock_entries()
            .retain(|_, state| matches!(state, EntryState::Pending(_)));
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
