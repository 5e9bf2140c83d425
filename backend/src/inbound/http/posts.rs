//! Post API handlers.
//!
//! ```text
//! GET    /api/v1/posts?cursor=...&limit=...
//! GET    /api/v1/posts/{id}
//! POST   /api/v1/posts {"title":"...","body":"..."}
//! DELETE /api/v1/posts/{id}
//! ```
//!
//! Mutations invalidate the `posts` resource class in the query cache on
//! success, so cached listings re-fetch instead of serving stale data.
//! Failed mutations invalidate nothing.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use pagination::{Cursor, Page, PageRequest};
use query_cache::QueryKey;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::{PostListPosition, PostListRequest};
use crate::domain::{Error, NewPost, Post, PostId, PostValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::DataEnvelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_uuid};

/// Resource-class prefix for every cached post query.
pub(crate) fn posts_class() -> QueryKey {
    QueryKey::root("posts")
}

/// Query parameters for the post listing.
#[derive(Debug, Deserialize)]
pub struct PostListParams {
    /// Opaque cursor from a previous page.
    pub cursor: Option<String>,
    /// Requested page size; clamped server-side.
    pub limit: Option<usize>,
}

/// Claims carried by a post-listing cursor.
#[derive(Debug, Serialize, Deserialize)]
struct PostCursorClaims {
    created_at: DateTime<Utc>,
    id: Uuid,
}

fn invalid_cursor_error() -> Error {
    Error::validation("cursor is invalid").with_details(json!({
        "field": "cursor",
        "code": "invalid_cursor",
    }))
}

fn decode_position(cursor: Option<&Cursor>) -> Result<Option<PostListPosition>, Error> {
    cursor
        .map(|cursor| {
            let claims: PostCursorClaims =
                cursor.decode().map_err(|_| invalid_cursor_error())?;
            Ok(PostListPosition {
                created_at: claims.created_at,
                id: PostId::from(claims.id),
            })
        })
        .transpose()
}

fn encode_position(post: &Post) -> Result<Cursor, pagination::CursorError> {
    Cursor::encode(&PostCursorClaims {
        created_at: post.created_at(),
        id: *post.id().as_uuid(),
    })
}

fn map_post_validation_error(err: PostValidationError) -> Error {
    match err {
        PostValidationError::EmptyTitle => Error::validation("title must not be empty")
            .with_details(json!({ "field": "title", "code": "empty_title" })),
        PostValidationError::TitleTooLong { max } => {
            Error::validation(format!("title must be at most {max} characters"))
                .with_details(json!({ "field": "title", "code": "title_too_long" }))
        }
        PostValidationError::InvalidId => Error::validation("post id must be a valid UUID")
            .with_details(json!({ "field": "postId", "code": "invalid_uuid" })),
    }
}

/// Request payload for creating a post.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Post title; 1–200 characters after trimming.
    pub title: Option<String>,
    /// Free-form body text.
    pub body: Option<String>,
}

/// List posts newest-first with opaque cursor pagination.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page"),
        ("limit" = Option<usize>, Query, description = "Page size, clamped server-side")
    ),
    responses(
        (status = 200, description = "One page of posts"),
        (status = 400, description = "Invalid cursor", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<PostListParams>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let params = params.into_inner();
    let request = PageRequest::new(params.cursor.map(Cursor::from_token), params.limit);
    let position = decode_position(request.cursor())?;

    let rows = state
        .posts
        .list_posts(&PostListRequest {
            position,
            fetch: request.fetch_size(),
        })
        .await?;

    let page = Page::from_rows(rows, request.limit(), encode_position)
        .map_err(|err| Error::internal(format!("cursor encoding failed: {err}")))?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(page)))
}

/// Fetch a single post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "The post", body = Post),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = PostId::from(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    let post = state
        .posts
        .fetch_post(&id)
        .await?
        .ok_or_else(|| Error::not_found("no such post"))?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(post)))
}

/// Create a post authored by the session subject.
///
/// Validation and authentication both precede the write; on success the
/// cached `posts` class is invalidated so the next read re-fetches.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created post", body = Post),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let payload = payload.into_inner();
    let title = payload
        .title
        .ok_or_else(|| missing_field_error(FieldName::new("title")))?;
    let body = payload.body.unwrap_or_default();
    let new_post = NewPost::try_from_parts(author, &title, &body)
        .map_err(map_post_validation_error)?;

    let post = state.posts_command.create_post(&new_post).await?;
    state.cache.invalidate_prefix(&posts_class());
    Ok(HttpResponse::Created().json(DataEnvelope::new(post)))
}

/// Delete a post owned by the session subject.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = PostId::from(parse_uuid(&path.into_inner(), FieldName::new("id"))?);
    state.posts_command.delete_post(&id, &actor).await?;
    state.cache.invalidate_prefix(&posts_class());
    Ok(HttpResponse::NoContent().finish())
}
