//! Diesel row types and their domain conversions.
//!
//! Read rows select only the columns the domain aggregate carries;
//! audit-only columns (`updated_at`) stay in the database.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::{PostPersistenceError, UserPersistenceError};
use crate::domain::{
    DisplayName, Email, Post, PostId, PostTitle, StoredPasswordHash, User, UserId,
};

use super::schema::{credentials, posts, users};

/// Queryable row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert a stored row into the domain aggregate.
    ///
    /// Rows violating domain validation indicate corrupt data and map to
    /// a query error rather than panicking.
    pub(crate) fn into_domain(self) -> Result<User, UserPersistenceError> {
        let email = Email::new(&self.email)
            .map_err(|err| UserPersistenceError::query(format!("corrupt user row: {err}")))?;
        let display_name = DisplayName::new(&self.display_name)
            .map_err(|err| UserPersistenceError::query(format!("corrupt user row: {err}")))?;
        Ok(User::new(
            UserId::from(self.id),
            email,
            display_name,
            self.created_at,
        ))
    }
}

/// Insertable row for user accounts.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            display_name: user.display_name().as_ref(),
            created_at: user.created_at(),
            updated_at: user.created_at(),
        }
    }
}

/// Queryable row for password credentials.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub password_hash: String,
}

impl CredentialRow {
    pub(crate) fn into_domain(self) -> StoredPasswordHash {
        StoredPasswordHash::from_phc(self.password_hash)
    }
}

/// Queryable row for posts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl PostRow {
    pub(crate) fn into_domain(self) -> Result<Post, PostPersistenceError> {
        let title = PostTitle::new(&self.title)
            .map_err(|err| PostPersistenceError::query(format!("corrupt post row: {err}")))?;
        Ok(Post::new(
            PostId::from(self.id),
            UserId::from(self.author_id),
            title,
            self.body,
            self.created_at,
        ))
    }
}

/// Insertable row for posts.
#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewPostRow<'a> {
    pub(crate) fn from_domain(post: &'a Post) -> Self {
        Self {
            id: *post.id().as_uuid(),
            author_id: *post.author_id().as_uuid(),
            title: post.title().as_ref(),
            body: post.body(),
            created_at: post.created_at(),
        }
    }
}
