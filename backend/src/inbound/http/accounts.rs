//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"ada@example.com","displayName":"Ada Lovelace","password":"..."}
//! POST /api/v1/login {"email":"ada@example.com","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```
//!
//! Every handler re-derives the session from the request cookie; none of
//! them trust a client-supplied identity.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, Registration, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::DataEnvelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email address for the new account.
    pub email: String,
    /// Public display name.
    pub display_name: String,
    /// Plaintext password; hashed before it is stored.
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.display_name, &value.password)
    }
}

fn email_reason(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyEmail => "empty_email",
        _ => "invalid_email",
    }
}

fn display_name_reason(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyDisplayName => "empty_display_name",
        UserValidationError::DisplayNameTooShort { .. } => "display_name_too_short",
        UserValidationError::DisplayNameTooLong { .. } => "display_name_too_long",
        _ => "invalid_display_name",
    }
}

pub(crate) fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::Email(inner) => Error::validation(inner.to_string())
            .with_details(json!({ "field": "email", "code": email_reason(&inner) })),
        CredentialValidationError::EmptyPassword => {
            Error::validation("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
        CredentialValidationError::PasswordTooShort { min } => {
            Error::validation(format!("password must be at least {min} characters"))
                .with_details(json!({ "field": "password", "code": "password_too_short" }))
        }
        CredentialValidationError::DisplayName(inner) => Error::validation(inner.to_string())
            .with_details(json!({ "field": "displayName", "code": display_name_reason(&inner) })),
    }
}

/// Create an account and establish a session for it.
///
/// The session is issued in the same response: a freshly registered
/// visitor is logged in, not bounced to the login form.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(map_credential_validation_error)?;
    let user = state.accounts.register(&registration).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(DataEnvelope::new(user)))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let user_id = state.accounts.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(json!({ "userId": user_id }))))
}

/// End the current session.
///
/// Idempotent: logging out without a session is still a success.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session ended"),
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account gone", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user = state.profile.fetch_profile(&user_id).await?;
    Ok(HttpResponse::Ok().json(DataEnvelope::new(user)))
}
