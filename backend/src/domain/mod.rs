//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — the Structured Result failure payload.
//! - `User`, `Post` — domain aggregates with validated primitives.
//! - `ports` — hexagonal boundary traits and in-memory implementations.

mod accounts_service;
pub mod credentials;
pub mod error;
mod password;
pub mod ports;
pub mod post;
mod posts_service;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::AccountsService;
pub use self::posts_service::PostsService;
pub use self::credentials::{CredentialValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::StoredPasswordHash;
pub use self::post::{NewPost, Post, PostId, PostTitle, PostValidationError, TITLE_MAX};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, Email, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
