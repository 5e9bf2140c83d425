//! Driving port for the authenticated user's profile.
//!
//! Inbound adapters (HTTP handlers, loaders) use this port to fetch the
//! session subject's account data without importing outbound persistence
//! concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading the authenticated user's profile.
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the session subject.
    ///
    /// A session pointing at a deleted account is a dangling reference,
    /// not a client mistake: surfaced as `NOT_FOUND`.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}
