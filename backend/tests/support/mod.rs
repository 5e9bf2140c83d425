//! Shared harness for backend integration tests.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::{SessionMiddleware, config::CookieContentSecurity};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use backend::Trace;
use backend::domain::ports::{InMemoryAccounts, InMemoryPosts};
use backend::inbound::http::accounts::{current_user, login, logout, register};
use backend::inbound::http::dashboard::{dashboard, login_page};
use backend::inbound::http::posts::{create_post, delete_post, get_post, list_posts};
use backend::inbound::http::state::{HttpState, HttpStatePorts};

/// Session middleware with an ephemeral key and lax cookies for tests.
pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Fully wired handler state over in-memory stores, with handles for
/// asserting on side effects.
pub fn in_memory_state() -> (HttpState, Arc<InMemoryAccounts>, Arc<InMemoryPosts>) {
    let accounts = Arc::new(InMemoryAccounts::new());
    let posts = Arc::new(InMemoryPosts::new());
    let state = HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        profile: accounts.clone(),
        posts: posts.clone(),
        posts_command: posts.clone(),
    });
    (state, accounts, posts)
}

/// The full application surface, mirroring the server wiring.
pub fn app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session_middleware())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(login)
                .service(logout)
                .service(current_user)
                .service(list_posts)
                .service(get_post)
                .service(create_post)
                .service(delete_post),
        )
        .service(dashboard)
        .service(login_page)
}

/// Register an account and return its session cookie.
pub async fn register_and_get_cookie<S>(app: &S, email: &str) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "email": email,
                "displayName": "Ada Lovelace",
                "password": "correct horse battery",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Read a response body as JSON.
pub async fn json_body(response: actix_web::dev::ServiceResponse) -> Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}
