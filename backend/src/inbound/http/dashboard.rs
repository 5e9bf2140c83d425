//! Dashboard page route: the authenticated data-loading contract end to end.
//!
//! Guard phase: [`PageSession`] redirects anonymous visitors to `/login`
//! before this handler runs, so no fetch can precede authentication.
//! Loader phase: the view's queries are declared as descriptors and
//! ensured resident concurrently. Render phase: reads are synchronous
//! against the cache; by construction there is no loading state and no
//! re-fetch.

use actix_web::{HttpResponse, get, web};
use chrono::Duration;
use query_cache::QueryKey;
use serde::Serialize;

use crate::domain::ports::PostListRequest;
use crate::domain::{Post, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::DataEnvelope;
use crate::inbound::http::guard::PageSession;
use crate::inbound::http::loader::{QueryDescriptor, load_all, read_as};
use crate::inbound::http::posts::posts_class;
use crate::inbound::http::state::HttpState;

/// Number of recent posts shown on the dashboard.
const RECENT_POSTS: usize = 5;

/// How long the profile query stays fresh.
const PROFILE_STALE_AFTER: i64 = 60;

/// How long the recent-posts query stays fresh.
const RECENT_POSTS_STALE_AFTER: i64 = 30;

/// Everything the dashboard view reads.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// The session subject's profile.
    pub profile: User,
    /// Latest posts, newest first.
    pub recent_posts: Vec<Post>,
}

fn profile_key(page: &PageSession) -> QueryKey {
    QueryKey::root("users")
        .with("profile")
        .with(*page.user_id().as_uuid())
}

fn recent_posts_key() -> QueryKey {
    posts_class().with("recent").with(RECENT_POSTS as i64)
}

/// Minimal login page, the target of the guard redirect.
///
/// The starter ships no front end; this shell marks where one mounts.
#[get("/login")]
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(concat!(
            "<!doctype html><title>Sign in</title>",
            "<p>POST /api/v1/login with {\"email\", \"password\"} to sign in.</p>",
        ))
}

/// Render the dashboard for the authenticated visitor.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardView),
        (status = 303, description = "Unauthenticated; redirected to /login"),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["pages"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    page: PageSession,
) -> ApiResult<HttpResponse> {
    let profile_key = profile_key(&page);
    let posts_key = recent_posts_key();

    let profile_port = state.profile.clone();
    let posts_port = state.posts.clone();
    let subject = page.user_id().clone();
    let descriptors = vec![
        QueryDescriptor::new(
            profile_key.clone(),
            Duration::seconds(PROFILE_STALE_AFTER),
            move || async move { profile_port.fetch_profile(&subject).await },
        ),
        QueryDescriptor::new(
            posts_key.clone(),
            Duration::seconds(RECENT_POSTS_STALE_AFTER),
            move || async move {
                posts_port
                    .list_posts(&PostListRequest {
                        position: None,
                        fetch: RECENT_POSTS,
                    })
                    .await
            },
        ),
    ];
    load_all(&state.cache, descriptors).await?;

    // Render phase: both queries are resident, so these reads are
    // synchronous and cannot miss.
    let profile: User = read_as(&state.cache, &profile_key)?;
    let recent_posts: Vec<Post> = read_as(&state.cache, &posts_key)?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(DashboardView {
        profile,
        recent_posts,
    })))
}
