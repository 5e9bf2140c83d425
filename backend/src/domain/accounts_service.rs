//! Account use-cases over the persistence ports.
//!
//! Implements the driving [`AccountService`] and [`UserProfileQuery`]
//! ports on top of the driven user and credential repositories, keeping
//! password verification and persistence-error mapping out of the HTTP
//! adapter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    AccountService, CredentialPersistenceError, CredentialRepository, UserPersistenceError,
    UserProfileQuery, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, Registration, StoredPasswordHash, User, UserId,
};

const BAD_CREDENTIALS: &str = "invalid email or password";

/// Repository-backed account service.
pub struct AccountsService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialRepository>,
}

impl AccountsService {
    /// Create a service over the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialRepository>,
    ) -> Self {
        Self { users, credentials }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account already exists for this email")
        }
    }
}

fn map_credential_persistence_error(error: CredentialPersistenceError) -> Error {
    match error {
        CredentialPersistenceError::Connection { message } => Error::service_unavailable(message),
        CredentialPersistenceError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl AccountService for AccountsService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::auth_required(BAD_CREDENTIALS))?;

        let hash = self
            .credentials
            .find_by_user(user.id())
            .await
            .map_err(map_credential_persistence_error)?
            .ok_or_else(|| Error::auth_required(BAD_CREDENTIALS))?;

        if hash.verify(credentials.password()) {
            Ok(user.id().clone())
        } else {
            Err(Error::auth_required(BAD_CREDENTIALS))
        }
    }

    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict("an account already exists for this email"));
        }

        let hash = StoredPasswordHash::hash(registration.password())?;
        let user = User::new(
            UserId::random(),
            registration.email().clone(),
            registration.display_name().clone(),
            Utc::now(),
        );

        // The insert still races a concurrent register for the same email;
        // the repository's unique index reports that as DuplicateEmail.
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;
        self.credentials
            .upsert(user.id(), &hash)
            .await
            .map_err(map_credential_persistence_error)?;
        Ok(user)
    }
}

#[async_trait]
impl UserProfileQuery for AccountsService {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("no account for this session"))
    }
}
