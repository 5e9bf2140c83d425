//! Post data model.
//!
//! The starter's example resource: enough surface to exercise the
//! validated-mutation and cache-invalidation paths end to end.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Maximum accepted title length in characters.
pub const TITLE_MAX: usize = 200;

/// Validation errors returned by the post constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// The identifier string was not a UUID.
    InvalidId,
    /// The title was empty or whitespace-only.
    EmptyTitle,
    /// The title exceeded [`TITLE_MAX`] characters.
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "post id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "title must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Validate and construct a [`PostId`] from raw input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PostValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| PostValidationError::InvalidId)
    }

    /// Generate a new random [`PostId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PostId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated post title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a [`PostTitle`].
    pub fn new(title: impl AsRef<str>) -> Result<Self, PostValidationError> {
        Self::from_owned(title.as_ref().to_owned())
    }

    fn from_owned(title: String) -> Result<Self, PostValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostTitle {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Published post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[schema(value_type = String, example = "7b1a63fe-6f3d-4f36-9c96-0ee659f1b8a6")]
    id: PostId,
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    author_id: UserId,
    #[schema(value_type = String, example = "Hello, world")]
    title: PostTitle,
    body: String,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Construct a post from already-validated parts.
    pub fn new(
        id: PostId,
        author_id: UserId,
        title: PostTitle,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            body,
            created_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &PostId {
        &self.id
    }

    /// Author of the post.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Validated title.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Free-form body text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Publication time; listings sort on this, newest first.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    author_id: UserId,
    title: PostTitle,
    body: String,
}

impl NewPost {
    /// Validate raw input into a creatable post.
    pub fn try_from_parts(
        author_id: UserId,
        title: &str,
        body: &str,
    ) -> Result<Self, PostValidationError> {
        Ok(Self {
            author_id,
            title: PostTitle::new(title)?,
            body: body.to_owned(),
        })
    }

    /// Author of the new post.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Validated title.
    pub fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Free-form body text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}
