//! Post use-cases over the persistence port.
//!
//! Implements the driving [`PostsQuery`] and [`PostsCommand`] ports on
//! top of the driven post repository: ownership checks, expected-failure
//! mapping, and construction of new aggregates all happen here, keeping
//! the HTTP adapter free of business rules.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    PostListRequest, PostPersistenceError, PostRepository, PostsCommand, PostsQuery,
};
use crate::domain::{Error, NewPost, Post, PostId, UserId};

/// Repository-backed post service.
pub struct PostsService {
    posts: Arc<dyn PostRepository>,
}

impl PostsService {
    /// Create a service over the given repository.
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}

fn map_post_persistence_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => Error::service_unavailable(message),
        PostPersistenceError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl PostsQuery for PostsService {
    async fn list_posts(&self, request: &PostListRequest) -> Result<Vec<Post>, Error> {
        self.posts
            .list_newest_first(request.position, request.fetch)
            .await
            .map_err(map_post_persistence_error)
    }

    async fn fetch_post(&self, id: &PostId) -> Result<Option<Post>, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_post_persistence_error)
    }
}

#[async_trait]
impl PostsCommand for PostsService {
    async fn create_post(&self, new_post: &NewPost) -> Result<Post, Error> {
        let post = Post::new(
            PostId::random(),
            new_post.author_id().clone(),
            new_post.title().clone(),
            new_post.body().to_owned(),
            Utc::now(),
        );
        self.posts
            .insert(&post)
            .await
            .map_err(map_post_persistence_error)?;
        Ok(post)
    }

    async fn delete_post(&self, id: &PostId, actor: &UserId) -> Result<(), Error> {
        let post = self
            .posts
            .find_by_id(id)
            .await
            .map_err(map_post_persistence_error)?
            .ok_or_else(|| Error::not_found("no such post"))?;

        if post.author_id() != actor {
            return Err(Error::forbidden("only the author can delete this post"));
        }

        let deleted = self
            .posts
            .delete(id)
            .await
            .map_err(map_post_persistence_error)?;
        if !deleted {
            // Raced another delete; the post is gone either way.
            return Err(Error::not_found("no such post"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Ownership and mapping coverage with a stub repository.
    use std::sync::Mutex;

    use rstest::rstest;

    use crate::domain::ports::PostListPosition;
    use crate::domain::{ErrorCode, PostTitle};

    use super::*;

    #[derive(Default)]
    struct StubRepo {
        posts: Mutex<Vec<Post>>,
        fail_connection: bool,
    }

    impl StubRepo {
        fn with_post(post: Post) -> Arc<Self> {
            let repo = Self::default();
            repo.posts.lock().expect("posts lock").push(post);
            Arc::new(repo)
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail_connection: true,
                ..Self::default()
            })
        }
    }

    #[async_trait]
    impl PostRepository for StubRepo {
        async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
            if self.fail_connection {
                return Err(PostPersistenceError::connection("database unavailable"));
            }
            self.posts.lock().expect("posts lock").push(post.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
            if self.fail_connection {
                return Err(PostPersistenceError::connection("database unavailable"));
            }
            Ok(self
                .posts
                .lock()
                .expect("posts lock")
                .iter()
                .find(|post| post.id() == id)
                .cloned())
        }

        async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
            let mut posts = self.posts.lock().expect("posts lock");
            let before = posts.len();
            posts.retain(|post| post.id() != id);
            Ok(posts.len() < before)
        }

        async fn list_newest_first(
            &self,
            _position: Option<PostListPosition>,
            fetch: usize,
        ) -> Result<Vec<Post>, PostPersistenceError> {
            Ok(self
                .posts
                .lock()
                .expect("posts lock")
                .iter()
                .take(fetch)
                .cloned()
                .collect())
        }
    }

    fn author() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture author")
    }

    fn sample_post(author_id: &UserId) -> Post {
        Post::new(
            PostId::random(),
            author_id.clone(),
            PostTitle::new("Hello").expect("title"),
            "body".into(),
            Utc::now(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn create_persists_through_the_repository() {
        let repo = Arc::new(StubRepo::default());
        let service = PostsService::new(repo.clone());
        let new_post = NewPost::try_from_parts(author(), "Hello", "body").expect("valid post");

        let post = service.create_post(&new_post).await.expect("create");

        assert_eq!(post.title().as_ref(), "Hello");
        assert_eq!(repo.posts.lock().expect("posts lock").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_by_non_author_is_forbidden() {
        let post = sample_post(&author());
        let post_id = *post.id();
        let repo = StubRepo::with_post(post);
        let service = PostsService::new(repo.clone());
        let other = UserId::random();

        let err = service
            .delete_post(&post_id, &other)
            .await
            .expect_err("forbidden");

        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(repo.posts.lock().expect("posts lock").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_of_missing_post_is_not_found() {
        let service = PostsService::new(Arc::new(StubRepo::default()));
        let err = service
            .delete_post(&PostId::random(), &author())
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_surface_as_service_unavailable() {
        let service = PostsService::new(StubRepo::failing());
        let err = service
            .fetch_post(&PostId::random())
            .await
            .expect_err("unavailable");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
