//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::{
    SessionMiddleware, config::CookieContentSecurity, storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::accounts::{current_user, login, logout, register};
use crate::inbound::http::dashboard::{dashboard, login_page};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::posts::{create_post, delete_post, get_post, list_posts};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use state_builders::build_http_state;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .build();

    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(list_posts)
        .service(get_post)
        .service(create_post)
        .service(delete_post);

    let mut app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(dashboard)
        .service(login_page)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}

/// Build the HTTP server and its shared health state.
///
/// The caller marks the health state ready once the server is running;
/// readiness probes report 503 until then.
pub fn build_server(config: ServerConfig) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let http_state = web::Data::new(build_http_state(&config));
    let health_state = web::Data::new(HealthState::new());

    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        key: config.key.clone(),
        cookie_secure: config.cookie_secure,
        same_site: config.same_site,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    Ok((server, health_state))
}
