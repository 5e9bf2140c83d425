//! Diesel-backed `PostRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostListPosition, PostPersistenceError, PostRepository};
use crate::domain::{Post, PostId};

use super::models::{NewPostRow, PostRow};
use super::pool::DbPool;
use super::schema::posts;

/// PostgreSQL post repository over the shared pool.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PostPersistenceError::connection(err.to_string()))?;

        let row = NewPostRow::from_domain(post);
        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PostPersistenceError::connection(err.to_string()))?;

        let row: Option<PostRow> = posts::table
            .find(id.as_uuid())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;

        row.map(PostRow::into_domain).transpose()
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PostPersistenceError::connection(err.to_string()))?;

        let deleted = diesel::delete(posts::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        Ok(deleted > 0)
    }

    async fn list_newest_first(
        &self,
        position: Option<PostListPosition>,
        fetch: usize,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PostPersistenceError::connection(err.to_string()))?;

        let mut query = posts::table
            .select(PostRow::as_select())
            .order((posts::created_at.desc(), posts::id.desc()))
            .into_boxed();

        if let Some(position) = position {
            // Keyset resumption: strictly older, or same instant with a
            // smaller id.
            query = query.filter(
                posts::created_at.lt(position.created_at).or(posts::created_at
                    .eq(position.created_at)
                    .and(posts::id.lt(*position.id.as_uuid()))),
            );
        }

        let rows: Vec<PostRow> = query
            .limit(i64::try_from(fetch).unwrap_or(i64::MAX))
            .load(&mut conn)
            .await
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;

        rows.into_iter().map(PostRow::into_domain).collect()
    }
}
