//! The authenticated data-loading contract, end to end: guard redirect
//! before any fetch, loader residency, fresh-cache idempotence, and
//! mutation-driven invalidation.

mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use rstest::rstest;
use serde_json::json;

use support::{app, in_memory_state, json_body, register_and_get_cookie};

#[rstest]
#[actix_web::test]
async fn dashboard_without_session_redirects_to_login() {
    let (state, _accounts, _posts) = in_memory_state();
    let app = test::init_service(app(state)).await;

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/login")
    );

    // The redirect target exists.
    let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn dashboard_renders_profile_and_recent_posts() {
    let (state, _accounts, _posts) = in_memory_state();
    let app = test::init_service(app(state)).await;
    let cookie = register_and_get_cookie(&app, "ada@example.com").await;

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie.clone())
            .set_json(json!({ "title": "First post", "body": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["profile"]["email"], "ada@example.com");
    assert_eq!(body["data"]["recentPosts"][0]["title"], "First post");
}

#[rstest]
#[actix_web::test]
async fn mutation_invalidates_the_cached_dashboard() {
    let (state, _accounts, _posts) = in_memory_state();
    let app = test::init_service(app(state)).await;
    let cookie = register_and_get_cookie(&app, "ada@example.com").await;

    // Warm the cache with an empty recent-posts listing.
    let first = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let first_body = json_body(first).await;
    assert_eq!(
        first_body["data"]["recentPosts"]
            .as_array()
            .map(Vec::len),
        Some(0)
    );

    // The mutation must make the cached listing observably consistent.
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie.clone())
            .set_json(json!({ "title": "Fresh", "body": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let second = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let second_body = json_body(second).await;
    assert_eq!(second_body["data"]["recentPosts"][0]["title"], "Fresh");
}

#[rstest]
#[actix_web::test]
async fn failed_mutation_leaves_the_cache_alone() {
    let (state, _accounts, _posts) = in_memory_state();
    let shared_cache = state.cache.clone();
    let app = test::init_service(app(state)).await;
    let cookie = register_and_get_cookie(&app, "ada@example.com").await;

    // Warm the cache.
    test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/dashboard")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let recent_key = query_cache::QueryKey::root("posts").with("recent").with(5_i64);
    assert!(shared_cache.peek(&recent_key).is_some(), "cache warmed");

    // A validation failure must not invalidate.
    let rejected = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie)
            .set_json(json!({ "title": "", "body": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert!(
        shared_cache.peek(&recent_key).is_some(),
        "failed mutation must not drop cache entries"
    );
}
