//! Driving port for account use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it
//! to authenticate credentials or create accounts without knowing the
//! backing infrastructure, so handler tests can substitute a test double
//! instead of wiring persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Error, LoginCredentials, Registration, StoredPasswordHash, User, UserId,
};

use super::profile::UserProfileQuery;

/// Uniform login-failure message; never reveals which factor failed.
pub(crate) const BAD_CREDENTIALS: &str = "invalid email or password";

/// Domain use-case port for authentication and account creation.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Create a new account with a password credential.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}

#[derive(Default)]
struct AccountsState {
    users: HashMap<UserId, User>,
    emails: HashMap<String, UserId>,
    credentials: HashMap<UserId, StoredPasswordHash>,
}

/// In-memory account store for development mode and handler tests.
///
/// Backs both [`AccountService`] and [`UserProfileQuery`] from one map so
/// a register-then-login-then-profile flow works without a database.
#[derive(Default)]
pub struct InMemoryAccounts {
    state: Mutex<AccountsState>,
}

impl InMemoryAccounts {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, AccountsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored accounts; used by tests asserting on side effects.
    pub fn len(&self) -> usize {
        self.lock_state().users.len()
    }

    /// Whether the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountService for InMemoryAccounts {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let (user_id, hash) = {
            let state = self.lock_state();
            let Some(user_id) = state.emails.get(credentials.email().as_ref()).cloned() else {
                return Err(Error::auth_required(BAD_CREDENTIALS));
            };
            let Some(hash) = state.credentials.get(&user_id).cloned() else {
                return Err(Error::auth_required(BAD_CREDENTIALS));
            };
            (user_id, hash)
        };

        if hash.verify(credentials.password()) {
            Ok(user_id)
        } else {
            Err(Error::auth_required(BAD_CREDENTIALS))
        }
    }

    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let hash = StoredPasswordHash::hash(registration.password())?;
        let user = User::new(
            UserId::random(),
            registration.email().clone(),
            registration.display_name().clone(),
            Utc::now(),
        );

        let mut state = self.lock_state();
        if state.emails.contains_key(registration.email().as_ref()) {
            return Err(Error::conflict("an account already exists for this email"));
        }
        state
            .emails
            .insert(registration.email().as_ref().to_owned(), user.id().clone());
        state.credentials.insert(user.id().clone(), hash);
        state.users.insert(user.id().clone(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserProfileQuery for InMemoryAccounts {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.lock_state()
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("no account for this session"))
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour coverage for the in-memory account store.
    use rstest::rstest;

    use crate::domain::ErrorCode;

    use super::*;

    fn registration() -> Registration {
        Registration::try_from_parts("ada@example.com", "Ada Lovelace", "correct horse battery")
            .expect("valid registration")
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(email, password).expect("valid credentials")
    }

    #[rstest]
    #[tokio::test]
    async fn register_then_authenticate_round_trips() {
        let accounts = InMemoryAccounts::new();
        let user = accounts.register(&registration()).await.expect("register");

        let user_id = accounts
            .authenticate(&credentials("ada@example.com", "correct horse battery"))
            .await
            .expect("authenticate");

        assert_eq!(&user_id, user.id());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let accounts = InMemoryAccounts::new();
        accounts.register(&registration()).await.expect("register");

        let err = accounts
            .register(&registration())
            .await
            .expect_err("duplicate register");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(accounts.len(), 1);
    }

    #[rstest]
    #[case("ada@example.com", "wrong password")]
    #[case("nobody@example.com", "correct horse battery")]
    #[tokio::test]
    async fn login_failure_is_uniform(#[case] email: &str, #[case] password: &str) {
        let accounts = InMemoryAccounts::new();
        accounts.register(&registration()).await.expect("register");

        let err = accounts
            .authenticate(&credentials(email, password))
            .await
            .expect_err("authentication fails");

        assert_eq!(err.code(), ErrorCode::AuthRequired);
        assert_eq!(err.message(), BAD_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_returns_registered_account() {
        let accounts = InMemoryAccounts::new();
        let user = accounts.register(&registration()).await.expect("register");

        let profile = accounts.fetch_profile(user.id()).await.expect("profile");
        assert_eq!(profile.display_name().as_ref(), "Ada Lovelace");
    }

    #[rstest]
    #[tokio::test]
    async fn profile_for_unknown_subject_is_not_found() {
        let accounts = InMemoryAccounts::new();
        let err = accounts
            .fetch_profile(&UserId::random())
            .await
            .expect_err("missing profile");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
