//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::{SessionMiddleware, config::CookieContentSecurity};
use actix_web::cookie::{Key, SameSite};

use crate::domain::ports::{InMemoryAccounts, InMemoryPosts};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Session middleware with an ephemeral key and lax cookies for tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Handler state backed by in-memory stores.
pub fn fixture_state() -> HttpState {
    let (state, _accounts, _posts) = fixture_state_with_handles();
    state
}

/// Handler state plus handles to the backing stores, for tests that
/// assert on side effects (or their absence).
pub fn fixture_state_with_handles() -> (HttpState, Arc<InMemoryAccounts>, Arc<InMemoryPosts>) {
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
