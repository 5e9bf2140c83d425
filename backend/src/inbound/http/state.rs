//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they
//! only depend on domain ports (use-cases) and the query cache, and
//! remain testable without I/O.

use std::sync::Arc;

use query_cache::QueryCache;

use crate::domain::ports::{AccountService, PostsCommand, PostsQuery, UserProfileQuery};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Authentication and registration use-cases.
    pub accounts: Arc<dyn AccountService>,
    /// Profile reads for the session subject.
    pub profile: Arc<dyn UserProfileQuery>,
    /// Post reads.
    pub posts: Arc<dyn PostsQuery>,
    /// Post mutations.
    pub posts_command: Arc<dyn PostsCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication and registration use-cases.
    pub accounts: Arc<dyn AccountService>,
    /// Profile reads for the session subject.
    pub profile: Arc<dyn UserProfileQuery>,
    /// Post reads.
    pub posts: Arc<dyn PostsQuery>,
    /// Post mutations.
    pub posts_command: Arc<dyn PostsCommand>,
    /// Query cache backing route loaders.
    pub cache: Arc<QueryCache>,
}

impl HttpState {
    /// Construct state from a ports bundle and a fresh cache.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{InMemoryAccounts, InMemoryPosts};
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let accounts = Arc::new(InMemoryAccounts::new());
    /// let posts = Arc::new(InMemoryPosts::new());
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: accounts.clone(),
    ///     profile: accounts,
    ///     posts: posts.clone(),
    ///     posts_command: posts,
    /// });
    /// let _cache = state.cache.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_cache(ports, Arc::new(QueryCache::new()))
    }

    /// Construct state sharing an existing cache.
    pub fn with_cache(ports: HttpStatePorts, cache: Arc<QueryCache>) -> Self {
        let HttpStatePorts {
            accounts,
            profile,
            posts,
            posts_command,
        } = ports;
        Self {
            accounts,
            profile,
            posts,
            posts_command,
            cache,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
