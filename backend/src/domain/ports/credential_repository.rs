//! Port abstraction for credential persistence adapters.
use async_trait::async_trait;

use crate::domain::{StoredPasswordHash, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by credential repository adapters.
    pub enum CredentialPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "credential repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "credential repository query failed: {message}",
    }
}

/// Driven port for password-credential persistence.
///
/// Credentials live apart from the user record so alternative factors
/// (OAuth identities, passkeys) can join later without reshaping users.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Store or replace the password hash for a user.
    async fn upsert(
        &self,
        user_id: &UserId,
        hash: &StoredPasswordHash,
    ) -> Result<(), CredentialPersistenceError>;

    /// Fetch the stored password hash for a user, if any.
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StoredPasswordHash>, CredentialPersistenceError>;
}
