//! Password hashing and verification.
//!
//! Argon2id with the crate's default memory-hard parameters; hashes are
//! stored as self-describing PHC strings so parameters can evolve without
//! a migration. Verification failures and malformed stored hashes are
//! deliberately indistinguishable to callers: both mean "not this user".

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::{Error, ErrorCode};

/// Stored Argon2id password hash in PHC format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPasswordHash(String);

impl StoredPasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| {
                Error::new(ErrorCode::InternalError, format!("password hashing failed: {err}"))
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a PHC string loaded from storage without re-validating it.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Whether `password` matches this hash.
    ///
    /// A malformed stored hash verifies as `false`; it is logged by the
    /// caller as a data problem, never surfaced to the requester.
    pub fn verify(&self, password: &str) -> bool {
        match PasswordHash::new(self.0.as_str()) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Borrow the PHC string for persistence.
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}
