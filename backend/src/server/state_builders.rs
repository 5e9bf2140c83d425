//! Builders for HTTP state ports.
//!
//! Uses database-backed services when a pool is configured and falls
//! back to the in-memory stores otherwise, so a bare `cargo run` serves
//! a working application.

use std::sync::Arc;

use crate::domain::ports::{InMemoryAccounts, InMemoryPosts};
use crate::domain::{AccountsService, PostsService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DieselCredentialRepository, DieselPostRepository, DieselUserRepository,
};

use super::ServerConfig;

pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            let accounts = Arc::new(AccountsService::new(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselCredentialRepository::new(pool.clone())),
            ));
            let posts = Arc::new(PostsService::new(Arc::new(DieselPostRepository::new(
                pool.clone(),
            ))));
            HttpState::new(HttpStatePorts {
                accounts: accounts.clone(),
                profile: accounts,
                posts: posts.clone(),
                posts_command: posts,
            })
        }
        None => {
            let accounts = Arc::new(InMemoryAccounts::new());
            let posts = Arc::new(InMemoryPosts::new());
            HttpState::new(HttpStatePorts {
                accounts: accounts.clone(),
                profile: accounts,
                posts: posts.clone(),
                posts_command: posts,
            })
        }
    }
}
