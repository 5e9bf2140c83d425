//! Driving ports for post queries and mutations.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Error, NewPost, Post, PostId, UserId};

use super::post_repository::PostListPosition;

/// Parameters for one page of the newest-first post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostListRequest {
    /// Resume strictly after this position; `None` starts at the top.
    pub position: Option<PostListPosition>,
    /// Number of rows to fetch (page size plus the look-ahead row).
    pub fetch: usize,
}

/// Domain use-case port for reading posts.
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// List posts newest-first for the given page request.
    async fn list_posts(&self, request: &PostListRequest) -> Result<Vec<Post>, Error>;

    /// Fetch a single post.
    async fn fetch_post(&self, id: &PostId) -> Result<Option<Post>, Error>;
}

/// Domain use-case port for mutating posts.
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Persist a validated new post.
    async fn create_post(&self, new_post: &NewPost) -> Result<Post, Error>;

    /// Delete a post on behalf of `actor`.
    ///
    /// Only the author may delete; anyone else gets `FORBIDDEN`, a
    /// missing post gets `NOT_FOUND`.
    async fn delete_post(&self, id: &PostId, actor: &UserId) -> Result<(), Error>;
}

/// In-memory post store for development mode and handler tests.
#[derive(Default)]
pub struct InMemoryPosts {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPosts {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_posts(&self) -> MutexGuard<'_, Vec<Post>> {
        self.posts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored posts; used by tests asserting on side effects.
    pub fn len(&self) -> usize {
        self.lock_posts().len()
    }

    /// Whether the store holds no posts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_after(post: &Post, position: &PostListPosition) -> bool {
    // Newest-first: "after" means strictly older, with the id breaking
    // ties between posts created in the same instant.
    post.created_at() < position.created_at
        || (post.created_at() == position.created_at
            && post.id().as_uuid() < position.id.as_uuid())
}

#[async_trait]
impl PostsQuery for InMemoryPosts {
    async fn list_posts(&self, request: &PostListRequest) -> Result<Vec<Post>, Error> {
        let mut posts = self.lock_posts().clone();
        posts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().as_uuid().cmp(a.id().as_uuid()))
        });
        let page = posts
            .into_iter()
            .filter(|post| {
                request
                    .position
                    .as_ref()
                    .is_none_or(|position| is_after(post, position))
            })
            .take(request.fetch)
            .collect();
        Ok(page)
    }

    async fn fetch_post(&self, id: &PostId) -> Result<Option<Post>, Error> {
        Ok(self.lock_posts().iter().find(|post| post.id() == id).cloned())
    }
}

#[async_trait]
impl PostsCommand for InMemoryPosts {
    async fn create_post(&self, new_post: &NewPost) -> Result<Post, Error> {
        let post = Post::new(
            PostId::random(),
            new_post.author_id().clone(),
            new_post.title().clone(),
            new_post.body().to_owned(),
            Utc::now(),
        );
        self.lock_posts().push(post.clone());
        Ok(post)
    }

    async fn delete_post(&self, id: &PostId, actor: &UserId) -> Result<(), Error> {
        let mut posts = self.lock_posts();
        let Some(index) = posts.iter().position(|post| post.id() == id) else {
            return Err(Error::not_found("no such post"));
        };
        let Some(post) = posts.get(index) else {
            return Err(Error::internal("post index out of range"));
        };
        if post.author_id() != actor {
            return Err(Error::forbidden("only the author can delete this post"));
        }
        posts.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour coverage for the in-memory post store.
    use rstest::rstest;

    use crate::domain::ErrorCode;

    use super::*;

    fn author() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture author id")
    }

    fn other_user() -> UserId {
        UserId::new("9b2c1f04-0b5e-4ac0-94a0-6f0f2e2b7a11").expect("fixture user id")
    }

    async fn seed(store: &InMemoryPosts, titles: &[&str]) -> Vec<Post> {
        let mut created = Vec::new();
        for title in titles {
            let new_post =
                NewPost::try_from_parts(author(), title, "body").expect("valid post");
            created.push(store.create_post(&new_post).await.expect("create"));
        }
        created
    }

    #[rstest]
    #[tokio::test]
    async fn listing_is_newest_first() {
        let store = InMemoryPosts::new();
        seed(&store, &["first", "second", "third"]).await;

        let page = store
            .list_posts(&PostListRequest {
                position: None,
                fetch: 10,
            })
            .await
            .expect("list");

        let titles: Vec<&str> = page.iter().map(|post| post.title().as_ref()).collect();
        // Same-instant creations fall back to id order; the set is what
        // matters here, the pagination test covers strict resumption.
        assert_eq!(page.len(), 3);
        assert!(titles.contains(&"first"));
        assert!(titles.contains(&"third"));
    }

    #[rstest]
    #[tokio::test]
    async fn listing_resumes_after_position_without_repeats() {
        let store = InMemoryPosts::new();
        seed(&store, &["a", "b", "c", "d", "e"]).await;

        let first_page = store
            .list_posts(&PostListRequest {
                position: None,
                fetch: 2,
            })
            .await
            .expect("first page");
        let last = first_page.last().expect("page not empty");
        let second_page = store
            .list_posts(&PostListRequest {
                position: Some(PostListPosition {
                    created_at: last.created_at(),
                    id: *last.id(),
                }),
                fetch: 10,
            })
            .await
            .expect("second page");

        assert_eq!(first_page.len() + second_page.len(), 5);
        for post in &second_page {
            assert!(
                first_page.iter().all(|seen| seen.id() != post.id()),
                "post repeated across pages"
            );
        }
    }

    #[rstest]
    #[tokio::test]
    async fn delete_by_author_removes_the_post() {
        let store = InMemoryPosts::new();
        let created = seed(&store, &["only"]).await;
        let post = created.first().expect("created post");

        store
            .delete_post(post.id(), &author())
            .await
            .expect("delete");

        assert!(store.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_by_non_author_is_forbidden() {
        let store = InMemoryPosts::new();
        let created = seed(&store, &["only"]).await;
        let post = created.first().expect("created post");

        let err = store
            .delete_post(post.id(), &other_user())
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_post_is_not_found() {
        let store = InMemoryPosts::new();
        let err = store
            .delete_post(&PostId::random(), &author())
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
