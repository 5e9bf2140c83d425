//! Port abstraction for post persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Keyset position within the newest-first post ordering.
///
/// Listing resumes strictly after `(created_at, id)`; the id breaks ties
/// between posts created in the same instant so no row is skipped or
/// repeated across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostListPosition {
    /// Creation time of the last item on the previous page.
    pub created_at: DateTime<Utc>,
    /// Identifier of the last item on the previous page.
    pub id: PostId,
}

/// Driven port for post persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Delete a post, reporting whether a row existed.
    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError>;

    /// List up to `fetch` posts newest-first, resuming after `position`.
    async fn list_newest_first(
        &self,
        position: Option<PostListPosition>,
        fetch: usize,
    ) -> Result<Vec<Post>, PostPersistenceError>;
}
