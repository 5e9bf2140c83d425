//! Loader phase of the authenticated data-loading contract.
//!
//! A guarded route declares the queries its view reads as
//! [`QueryDescriptor`]s (key + staleness window + fetch). Before
//! rendering, [`load_all`] ensures every descriptor is resident in the
//! query cache, issuing the fetches for independent descriptors
//! concurrently; awaiting them one by one would serialise unrelated I/O
//! and is treated as a defect. Afterwards the render step reads the
//! values synchronously with [`read_as`]: no loading state, no
//! re-fetch.

use std::future::Future;

use chrono::Duration;
use futures_util::future::{LocalBoxFuture, try_join_all};
use query_cache::{QueryCache, QueryKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::Error;

type BoxFetch = Box<dyn FnOnce() -> LocalBoxFuture<'static, Result<Value, Error>>>;

/// One query a route needs resident before its view renders.
pub struct QueryDescriptor {
    key: QueryKey,
    stale_after: Duration,
    fetch: BoxFetch,
}

impl QueryDescriptor {
    /// Describe a query by key, staleness window, and fetch function.
    ///
    /// The fetch runs only on a cache miss or stale entry; its typed
    /// result is stored as JSON so heterogeneous queries share one cache.
    pub fn new<F, Fut, T>(key: QueryKey, stale_after: Duration, fetch: F) -> Self
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Result<T, Error>> + 'static,
        T: Serialize,
    {
        let boxed: BoxFetch = Box::new(move || {
            Box::pin(async move {
                let value = fetch().await?;
                serde_json::to_value(value)
                    .map_err(|err| Error::internal(format!("query result not serialisable: {err}")))
            })
        });
        Self {
            key,
            stale_after,
            fetch: boxed,
        }
    }

    /// The cache key this descriptor ensures.
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// Ensure every descriptor is resident, fetching misses concurrently.
///
/// Returns the first fetch failure, which surfaces through the route's
/// Structured Result path; entries already ensured stay cached.
pub async fn load_all(
    cache: &QueryCache,
    descriptors: Vec<QueryDescriptor>,
) -> Result<(), Error> {
    let ensures = descriptors.into_iter().map(|descriptor| {
        let QueryDescriptor {
            key,
            stale_after,
            fetch,
        } = descriptor;
        async move {
            cache.ensure(&key, stale_after, fetch).await?;
            Ok::<_, Error>(())
        }
    });
    try_join_all(ensures).await?;
    Ok(())
}

/// Synchronously read a value the loader proved resident.
///
/// Calling this for a key that was not part of the preceding
/// [`load_all`] is a programming error and surfaces as `INTERNAL_ERROR`.
pub fn read_as<T: DeserializeOwned>(cache: &QueryCache, key: &QueryKey) -> Result<T, Error> {
    let value = cache
        .peek(key)
        .ok_or_else(|| Error::internal(format!("query {key} not resident after load")))?;
    serde_json::from_value(value.as_ref().clone())
        .map_err(|err| Error::internal(format!("cached value for {key} has wrong shape: {err}")))
}
