//! Route guard for authenticated pages.
//!
//! The guard phase of a page transition: extracting [`PageSession`]
//! resolves the session before the handler body runs, and an
//! unauthenticated visitor is redirected to the login route instead. The
//! redirect is terminal; no loader or render work happens afterwards,
//! so a guarded route can assume an authenticated subject throughout.
//!
//! API routes return `401 AUTH_REQUIRED` envelopes instead; this redirect
//! behaviour is for server-rendered pages only.

use actix_session::Session;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::UserId;
use crate::inbound::http::session::SessionContext;

/// Path of the login page unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Terminal guard signal: the visitor must authenticate first.
///
/// Not a recoverable error. Converting it into a response produces
/// `303 See Other` pointing at [`LOGIN_PATH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginRedirect;

impl std::fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "redirecting unauthenticated visitor to {LOGIN_PATH}")
    }
}

impl ResponseError for LoginRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGIN_PATH))
            .finish()
    }
}

/// Authenticated session subject for a guarded page.
///
/// Extracting this type is the guard phase: it either yields the
/// validated user id or short-circuits the request with a redirect.
/// Cookie decode failures and tampered ids count as "no session"; the
/// guard never fails open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSession(UserId);

impl PageSession {
    /// The authenticated user id proven by the guard.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for PageSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move {
            let session = SessionContext::new(fut.await?);
            match session.user_id() {
                Ok(Some(user_id)) => Ok(Self(user_id)),
                Ok(None) | Err(_) => Err(LoginRedirect.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use crate::domain::Error;
    use crate::inbound::http::test_utils::test_session_middleware;

    use super::*;

    fn guarded_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/login-as",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                        .expect("fixture id");
                    session.persist_user(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/dashboard",
                web::get().to(|page: PageSession| async move {
                    HttpResponse::Ok().body(page.user_id().to_string())
                }),
            )
    }

    #[actix_web::test]
    async fn anonymous_visitor_is_redirected_to_login() {
        let app = test::init_service(guarded_app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/dashboard").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok());
        assert_eq!(location, Some(LOGIN_PATH));
    }

    #[actix_web::test]
    async fn authenticated_visitor_passes_the_guard() {
        let app = test::init_service(guarded_app()).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/login-as").to_request(),
        )
        .await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }
}
