//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API: all HTTP endpoints from the inbound
//! layer, the shared request/response schemas, and the session-cookie
//! security scheme. The generated specification backs Swagger UI in
//! debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Post, User};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::dashboard::DashboardView;
use crate::inbound::http::posts::CreatePostRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Groundwork backend API",
        description = "HTTP interface for session-authenticated access, posts, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Post,
        LoginRequest,
        RegisterRequest,
        CreatePostRequest,
        DashboardView,
    )),
    tags(
        (name = "accounts", description = "Registration, login, and the current user"),
        (name = "posts", description = "Post queries and mutations"),
        (name = "pages", description = "Server-rendered page routes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
